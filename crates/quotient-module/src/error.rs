//! Errors reported by module decompositions.

use quotient_linalg::LinalgError;
use thiserror::Error;

/// Errors that can occur in `quotient-module`.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The text encoding could not be read or written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A matrix supplied to a decomposition was malformed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// A persisted decomposition does not describe a consistent structure.
    #[error("inconsistent decomposition record: {0}")]
    InconsistentRecord(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ModuleError>;
