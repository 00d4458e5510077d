#![forbid(unsafe_code)]

//! Capability contracts an external control must satisfy to be bindable.
//!
//! A control surface is the toolkit-owned widget on the far side of a
//! binding. The engine never inspects concrete widget types; it dispatches on
//! which of the two traits a surface implements and, for collections, on the
//! [`SurfaceCaps`] the surface advertises.
//!
//! Methods take `&self`: widgets are shared with the toolkit and mutated
//! through interior mutability, and a write is allowed to fire the control's
//! own change event synchronously.

use bitflags::bitflags;

use crate::reactive::{ReactiveValue, Subscription};

bitflags! {
    /// Optional capabilities of a [`CollectionSurface`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceCaps: u8 {
        /// Accepts a settable backing collection (`set_source`).
        const SET_SOURCE = 1 << 0;
        /// Exposes a per-element checked/selected flag.
        const ITEM_FLAGS = 1 << 1;
        /// Reports per-element flag changes (`on_item_flag_changed`).
        const ITEM_FLAG_EVENTS = 1 << 2;
        /// Reports selection changes (`on_selection_changed`).
        const SELECTION_EVENTS = 1 << 3;
    }
}

/// A control holding a single value (text box, check box, numeric box, ...).
pub trait ScalarSurface<T> {
    /// Current value displayed by the control.
    fn read(&self) -> T;

    /// Replace the displayed value.
    fn write(&self, value: T);

    /// Register `callback` for the control's native change event.
    fn on_change(&self, callback: Box<dyn Fn()>) -> Subscription;
}

/// A control displaying a sequence of elements (list box, combo box,
/// checked list box, grid, ...).
///
/// Only [`visible_items`](Self::visible_items) and
/// [`capabilities`](Self::capabilities) are mandatory. The remaining methods
/// default to inert implementations; a surface must override exactly those
/// it advertises in `capabilities()`.
pub trait CollectionSurface<T> {
    /// Capabilities this surface supports.
    fn capabilities(&self) -> SurfaceCaps;

    /// Elements currently shown, in display order.
    fn visible_items(&self) -> Vec<T>;

    /// Replace the backing collection wholesale.
    fn set_source(&self, _items: Vec<T>) {}

    /// Checked/selected flag of the element at `index`.
    fn item_flag(&self, _index: usize) -> bool {
        false
    }

    /// Set the checked/selected flag of the element at `index`.
    fn set_item_flag(&self, _index: usize, _flag: bool) {}

    /// Register `callback(index, new_flag)` for per-element flag changes.
    fn on_item_flag_changed(&self, _callback: Box<dyn Fn(usize, bool)>) -> Option<Subscription> {
        None
    }

    /// Register `callback` for selection changes.
    fn on_selection_changed(&self, _callback: Box<dyn Fn()>) -> Option<Subscription> {
        None
    }
}

/// A `ReactiveValue` can stand on the control side of a binding, which makes
/// two observables mirror each other.
impl<T: Clone + PartialEq + 'static> ScalarSurface<T> for ReactiveValue<T> {
    fn read(&self) -> T {
        self.get()
    }

    fn write(&self, value: T) {
        self.set(value);
    }

    fn on_change(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| callback())
    }
}
