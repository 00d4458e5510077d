#![forbid(unsafe_code)]

//! Two-way synchronization between observables and control surfaces.
//!
//! - [`bind`]: validates an [`Endpoint`]/[`Surface`]/[`BindingKind`]
//!   combination and returns a live [`Binding`].
//! - [`ScalarSurface`] / [`CollectionSurface`]: the contracts a widget
//!   implements to be bindable, with optional capabilities advertised through
//!   [`SurfaceCaps`].
//! - [`BindingScope`]: groups bindings so they are released together.
//!
//! # Architecture
//!
//! Each binding owns one sync object per kind (scalar, data source, flags,
//! single flag). The sync object holds a [`SyncGuard`]; both propagation
//! paths enter the guard first, so a write's echo from the other side finds
//! the guard busy and is dropped. Listeners registered on either endpoint
//! capture the sync object weakly and are released when the [`Binding`] is
//! dropped.
//!
//! # Invariants
//!
//! 1. After `bind` succeeds, the control reflects the observable.
//! 2. A single trigger causes at most one write on the opposite side.
//! 3. A failed `bind` registers nothing and writes nothing.
//! 4. The guard returns to `Idle` after every propagation, even if the
//!    surface panics.

mod binding;
mod collection;
mod error;
mod options;
mod scalar;
mod scope;
mod state;
mod surface;

pub use binding::{Binding, Endpoint, Surface, bind, bind_values};
pub use error::BindError;
pub use options::{BindOptions, BindingKind, UpdateMode};
pub use scope::BindingScope;
pub use state::{SyncGuard, SyncState, SyncToken};
pub use surface::{CollectionSurface, ScalarSurface, SurfaceCaps};
