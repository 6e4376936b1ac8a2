//! Errors reported by matrix construction, decoding and result views.

use thiserror::Error;

use crate::eliminator::MatrixForm;

/// Errors that can occur in `quotient-linalg`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// Operand or buffer dimensions disagree.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// The expected shape or length.
        expected: String,
        /// The shape or length actually supplied.
        found: String,
    },

    /// The requested view is not derivable from this elimination form.
    #[error("{view} is not available for a {form:?} elimination")]
    UnsupportedForm {
        /// The view that was requested.
        view: &'static str,
        /// The form the matrix was reduced to.
        form: MatrixForm,
    },

    /// A serialized matrix failed validation.
    #[error("invalid matrix record: {0}")]
    InvalidRecord(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinalgError>;
