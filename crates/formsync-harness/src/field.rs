#![forbid(unsafe_code)]

//! Scalar control doubles.

use std::cell::{Cell, RefCell};

use formsync::{EventSource, ScalarSurface, Subscription};

/// An in-memory single-value widget.
///
/// Like most toolkits, a programmatic [`write`](ScalarSurface::write) raises
/// the same change event as user input unless the control was created with
/// [`silent`](Self::silent). Writes are counted so tests can assert that a
/// propagation did not bounce back.
#[derive(Debug)]
pub struct FieldControl<T: 'static> {
    value: RefCell<T>,
    writes: Cell<u32>,
    emit_on_write: bool,
    changed: EventSource<()>,
}

/// Text box double.
pub type TextBox = FieldControl<String>;
/// Numeric up/down double.
pub type NumericBox = FieldControl<i32>;
/// Check box double.
pub type CheckBox = FieldControl<bool>;

impl<T: Clone + 'static> FieldControl<T> {
    /// A control that raises its change event on programmatic writes.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            writes: Cell::new(0),
            emit_on_write: true,
            changed: EventSource::new(),
        }
    }

    /// A control whose change event only fires on user input.
    #[must_use]
    pub fn silent(value: T) -> Self {
        Self {
            emit_on_write: false,
            ..Self::new(value)
        }
    }

    /// Simulate the user editing the control.
    pub fn user_input(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.changed.emit(&());
    }

    /// Current displayed value.
    #[must_use]
    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Number of programmatic writes so far.
    #[must_use]
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    /// Live listeners on the control's change event.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.changed.live_subscriber_count()
    }
}

impl<T: Clone + 'static> ScalarSurface<T> for FieldControl<T> {
    fn read(&self) -> T {
        self.value()
    }

    fn write(&self, value: T) {
        self.writes.set(self.writes.get() + 1);
        *self.value.borrow_mut() = value;
        if self.emit_on_write {
            self.changed.emit(&());
        }
    }

    fn on_change(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.changed.subscribe(move |_| callback())
    }
}
