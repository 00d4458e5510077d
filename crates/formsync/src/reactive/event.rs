#![forbid(unsafe_code)]

//! Subscriber lists with RAII unsubscription.
//!
//! [`EventSource<A>`] is the notification channel behind every observable in
//! this crate. It is public so control-surface adapters can expose their
//! native change events with the same [`Subscription`] contract the binding
//! engine expects.
//!
//! # Design
//!
//! Callbacks are owned by the [`Subscription`] guard handed back to the
//! subscriber. The source only keeps `Weak` references, so a subscriber list
//! never keeps a callback (or anything the callback captured) alive.
//!
//! # Failure Modes
//!
//! - **Subscriber leak**: `Subscription` guards stored indefinitely keep their
//!   callbacks registered. Dead weak references are pruned lazily during
//!   [`EventSource::emit`].
//! - **Re-entrant emit**: safe. Live callbacks are collected before any of
//!   them runs, so a callback may subscribe, emit, or mutate its owner.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<A> = Rc<dyn Fn(&A)>;
type CallbackWeak<A> = Weak<dyn Fn(&A)>;

/// Name of the observable property a notification refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// The scalar value of a [`ReactiveValue`](super::ReactiveValue).
    Value,
    /// The element count of a list or selection set.
    Count,
    /// "Some element changed" for a list or selection set.
    Items,
}

impl Property {
    /// Stable textual name, as carried by change descriptors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "Value",
            Self::Count => "Count",
            Self::Items => "Item[]",
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list of subscriber callbacks receiving `&A` on every emission.
///
/// Cloning an `EventSource` creates a new handle to the **same** subscriber
/// list.
pub struct EventSource<A: 'static> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<A>>>>,
}

impl<A: 'static> Clone for EventSource<A> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<A: 'static> Default for EventSource<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> std::fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<A: 'static> EventSource<A> {
    /// Create a source with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register `callback` for every future emission.
    ///
    /// Dropping the returned [`Subscription`] detaches the callback.
    pub fn subscribe(&self, callback: impl Fn(&A) + 'static) -> Subscription {
        let strong: CallbackRc<A> = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Invoke every live subscriber with `args`, in registration order, and
    /// prune dead ones.
    pub fn emit(&self, args: &A) {
        let callbacks: Vec<CallbackRc<A>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(|w| w.upgrade()).collect()
        };
        for cb in &callbacks {
            cb(args);
        }
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Number of subscribers whose [`Subscription`] is still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the strong reference to the callback, so
/// the `Weak` held by the source fails to upgrade from then on.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
