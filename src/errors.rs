//! Shared error types used across submodules.

use thiserror::Error;

/// Top-level error type for the crate.
///
/// Field queries never produce errors: kernel singularities resolve to
/// documented limits or to the zero-vector sentinel. Errors are reserved for
/// malformed construction input and membership bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagnetostaticsError {
    /// Raised for zero rotation axes, non-finite inputs and invalid geometry.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Raised when removing a source that is not a member of a collection.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MagnetostaticsError>;
