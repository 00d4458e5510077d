#![forbid(unsafe_code)]

//! Observable primitives.
//!
//! - [`ReactiveValue`]: a shared, version-tracked scalar with change
//!   notification.
//! - [`ObservableVec`]: a shared, observable, index-addressable sequence.
//! - [`ReactiveList`]: an `ObservableVec` plus a [`SelectionSet`] and a single
//!   `selected_item`.
//! - [`EventSource`] / [`Subscription`]: the subscriber list behind all of the
//!   above, with RAII unsubscription.
//!
//! # Architecture
//!
//! Every observable is a cheap handle over `Rc<RefCell<..>>` state, so it is
//! single-threaded (`!Send`) by construction. Subscribers are stored as `Weak`
//! callbacks and cleaned up lazily during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes state.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. List mutations emit `Changed`, `CountChanged`, `ItemsChanged`, in that
//!    order.
//! 5. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod event;
pub mod list;
pub mod selection;
pub mod value;

pub use event::{EventSource, Property, Subscription};
pub use list::{ListChange, ListError, ListEvent, ObservableVec, ReactiveList};
pub use selection::SelectionSet;
pub use value::ReactiveValue;
