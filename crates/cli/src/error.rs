//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The SQLite database file does not exist.
    ///
    /// Opening would silently create an empty store, so this is reported instead.
    #[error("database not found at {path}. Run 'warden import' first")]
    DatabaseNotFound { path: PathBuf },

    /// A `--date` argument could not be parsed.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Login was refused.
    #[error(transparent)]
    Auth(#[from] access::AuthFailure),

    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// An error occurred in the access layer.
    #[error(transparent)]
    Access(#[from] access::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
