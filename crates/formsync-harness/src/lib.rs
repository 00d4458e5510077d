#![forbid(unsafe_code)]

//! Test harness and reference fixtures for formsync.
//!
//! This crate provides:
//! - [`FieldControl`]: an in-memory scalar widget ([`TextBox`], [`NumericBox`],
//!   [`CheckBox`]) that counts programmatic writes
//! - [`ListControl`]: an in-memory list widget with configurable
//!   [`SurfaceCaps`](formsync::SurfaceCaps) and single or multi selection
//! - [`capture_events`]: runs a closure under a `tracing` subscriber that
//!   records every event, for asserting on binding diagnostics

pub mod capture;
pub mod field;
pub mod list;

pub use capture::{CapturedEvent, capture_events};
pub use field::{CheckBox, FieldControl, NumericBox, TextBox};
pub use list::{ListControl, SelectionMode};
