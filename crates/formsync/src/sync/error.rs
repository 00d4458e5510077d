#![forbid(unsafe_code)]

//! Configuration errors raised by [`bind`](super::bind).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Endpoint mismatch | Kind needs a list, got a value (or vice versa) | `Err`, nothing wired |
//! | Surface mismatch | Scalar kind on a collection surface (or vice versa) | `Err`, nothing wired |
//! | Missing capability | Surface lacks a capability the kind needs | `Err`, nothing wired |

use super::options::BindingKind;
use super::surface::SurfaceCaps;

/// A binding request that cannot be satisfied.
///
/// A failed bind leaves both endpoints exactly as they were: no listener is
/// registered and nothing is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The observable endpoint cannot back this kind.
    EndpointMismatch {
        kind: BindingKind,
        endpoint: &'static str,
    },
    /// The control surface cannot host this kind.
    SurfaceMismatch {
        kind: BindingKind,
        surface: &'static str,
    },
    /// The collection surface lacks capabilities this kind needs.
    MissingCapability {
        kind: BindingKind,
        missing: SurfaceCaps,
    },
}

impl BindError {
    /// The binding kind that was requested.
    #[must_use]
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::EndpointMismatch { kind, .. }
            | Self::SurfaceMismatch { kind, .. }
            | Self::MissingCapability { kind, .. } => *kind,
        }
    }
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndpointMismatch { kind, endpoint } => {
                write!(f, "{kind} binding cannot be backed by a {endpoint} endpoint")
            }
            Self::SurfaceMismatch { kind, surface } => {
                write!(f, "{kind} binding is not supported by a {surface} surface")
            }
            Self::MissingCapability { kind, missing } => {
                write!(f, "{kind} binding requires surface capabilities {missing:?}")
            }
        }
    }
}

impl std::error::Error for BindError {}
