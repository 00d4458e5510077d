#![forbid(unsafe_code)]

//! Observable state and two-way bindings to UI controls.
//!
//! This crate provides:
//! - [`reactive`]: [`ReactiveValue`], [`ReactiveList`], and [`SelectionSet`],
//!   observables that notify subscribers synchronously on effective change
//! - [`sync`]: [`bind`], which keeps one observable and one control surface
//!   consistent in both directions without feedback loops
//!
//! Everything is single-threaded. Handles are `Rc`-based and `!Send`.
//!
//! Library code logs through `tracing` and installs no subscriber.

pub mod reactive;
pub mod sync;

pub use reactive::{
    EventSource, ListChange, ListError, ListEvent, ObservableVec, Property, ReactiveList,
    ReactiveValue, SelectionSet, Subscription,
};
pub use sync::{
    BindError, BindOptions, Binding, BindingKind, BindingScope, CollectionSurface, Endpoint,
    ScalarSurface, Surface, SurfaceCaps, SyncState, UpdateMode, bind, bind_values,
};
