#![forbid(unsafe_code)]

//! Observable scalar with change notification and version tracking.
//!
//! # Design
//!
//! [`ReactiveValue<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). When the value changes (determined by
//! `PartialEq`), all live subscribers are notified in registration order with
//! the new value. The notification always concerns [`Property::Value`].
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) plus `T::clone`       |
//! | `set()`       | O(S) where S = subscribers |
//! | `subscribe()` | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Set from a subscriber**: allowed. The value borrow is released before
//!   subscribers run, so a callback may call `set()` again; the nested call
//!   notifies before the outer notification loop continues.
//!
//! [`Property::Value`]: super::Property::Value

use std::cell::RefCell;
use std::rc::Rc;

use super::event::{EventSource, Subscription};

struct ValueInner<T> {
    value: T,
    version: u64,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning a `ReactiveValue` creates a new handle to the **same** inner
/// state: both handles see the same value and share subscribers.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
pub struct ReactiveValue<T: 'static> {
    inner: Rc<RefCell<ValueInner<T>>>,
    changed: EventSource<T>,
}

impl<T: 'static> Clone for ReactiveValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            changed: self.changed.clone(),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for ReactiveValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ReactiveValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &self.changed.subscriber_count())
            .finish()
    }
}

impl<T: std::fmt::Display + 'static> std::fmt::Display for ReactiveValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner.borrow().value, f)
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for ReactiveValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for ReactiveValue<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveValue<T> {
    /// Create a new reactive value with the given initial value.
    ///
    /// The initial version is 0 and no subscribers are registered.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ValueInner { value, version: 0 })),
            changed: EventSource::new(),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set a new value. If it differs from the current value (by
    /// `PartialEq`), the version is incremented and all live subscribers are
    /// notified. Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return false;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
        true
    }

    /// Modify the value in place via a closure. Subscribers are notified only
    /// if the result differs from the value before the call.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Subscribe to value changes. The callback receives the new value each
    /// time it changes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changed.subscriber_count()
    }

    /// Number of subscribers whose [`Subscription`] is still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        self.changed.live_subscriber_count()
    }

    fn notify(&self) {
        let value = self.get();
        self.changed.emit(&value);
    }
}
