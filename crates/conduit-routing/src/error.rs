//! Routing-specific error types

use thiserror::Error;

use crate::{Backend, Tier};

/// Errors a caller can trigger while routing
///
/// The decision engine itself never fails; only an explicit backend
/// override can be rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// Explicit override names a backend outside the catalog
    #[error("unsupported backend requested: {requested}")]
    UnsupportedBackend { requested: String },

    /// Explicit override names a backend the tier may not use
    #[error("backend {backend} is not available on the {tier} tier")]
    BackendNotEntitled { backend: Backend, tier: Tier },
}
