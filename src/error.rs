//!
//! error types of isoem
//!
use thiserror::Error;

///
/// Errors raised while validating an estimation input.
///
/// All of them indicate a malformed input and are raised before or
/// during the first E-step. Non-convergence is not an error (the
/// returned iteration count reports it).
///
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmError {
    /// zero-sized or inconsistent matrix/vector dimensions
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    /// a negative compatibility weight or abundance
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// a read whose posterior is undefined (no compatible isoform)
    #[error("ill-defined input: {0}")]
    IllDefinedInput(String),
}

/// Result alias using `EmError`
pub type Result<T> = std::result::Result<T, EmError>;
