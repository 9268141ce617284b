//! Access error types.

use thiserror::Error;

/// Access errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Navigation to a resource the session has no grant for.
    #[error("access to '{0}' is not permitted")]
    NotPermitted(String),

    /// The catalog configuration is invalid.
    #[error("invalid catalog: {0}")]
    Invalid(String),

    /// Failed to parse a catalog file.
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    /// An I/O error occurred while reading the catalog.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The principal store failed or returned a malformed record.
    #[error(transparent)]
    Store(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
