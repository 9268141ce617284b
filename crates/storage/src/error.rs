use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be turned into a [`crate::Principal`].
    #[error("malformed record for '{username}': {reason}")]
    MalformedRecord { username: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
