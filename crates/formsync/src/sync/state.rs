#![forbid(unsafe_code)]

//! Per-binding propagation state machine.
//!
//! ```text
//!            observable changed                  control changed
//!   Idle ───────────────────────▶ ToControl     Idle ─────────────▶ ToObservable
//!    ▲                                │          ▲                        │
//!    └──────── write completes ───────┘          └──── write completes ───┘
//! ```
//!
//! A trigger arriving while the state is not `Idle` is an echo of the
//! propagation in flight and is dropped.

use std::cell::Cell;

/// Propagation state of one binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SyncState {
    /// No propagation in flight.
    #[default]
    Idle,
    /// Writing the observable's value into the control.
    PropagatingToControl,
    /// Writing the control's value into the observable.
    PropagatingToObservable,
}

impl SyncState {
    /// Short name used in tracing fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PropagatingToControl => "to_control",
            Self::PropagatingToObservable => "to_observable",
        }
    }
}

/// Reentrancy guard owned by a single binding.
///
/// `Cell` is sufficient: bindings are built from `Rc` handles and never leave
/// their thread, so test-and-set cannot race.
#[derive(Debug, Default)]
pub struct SyncGuard {
    state: Cell<SyncState>,
}

impl SyncGuard {
    /// Create an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state.get()
    }

    /// Enter `direction` if idle. Returns `None` when another propagation is
    /// in flight. The returned token restores `Idle` when dropped, including
    /// during unwinding.
    #[must_use]
    pub fn enter(&self, direction: SyncState) -> Option<SyncToken<'_>> {
        debug_assert_ne!(direction, SyncState::Idle);
        if self.state.get() != SyncState::Idle {
            return None;
        }
        self.state.set(direction);
        Some(SyncToken { guard: self })
    }
}

/// Proof that a propagation is in flight; resets the guard on drop.
#[derive(Debug)]
pub struct SyncToken<'a> {
    guard: &'a SyncGuard,
}

impl Drop for SyncToken<'_> {
    fn drop(&mut self) {
        self.guard.state.set(SyncState::Idle);
    }
}
