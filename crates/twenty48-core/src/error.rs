use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by a key-value store.
///
/// Reads never fail: absent or unreadable values fall back to defaults.
/// Only writes report errors, and callers log them rather than stop play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backing store could not be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A value could not be written
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
    /// A value could not be encoded
    #[error("failed to serialize {key}: {reason}")]
    Serialize { key: String, reason: String },
}

impl StorageError {
    pub fn write(key: &str, reason: impl ToString) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
