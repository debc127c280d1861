// error.rs - Error types for the goal storage subsystem.

use thiserror::Error;

/// Errors that can occur while reading or writing a key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The store's lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}
