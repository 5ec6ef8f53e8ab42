//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read or write the backing file.
    #[error("Failed to access storage file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object.
    #[error("Failed to parse storage file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// A stored value does not have the type its key promises.
    #[error("Stored value for '{key}' has an unexpected shape: {source}")]
    Value {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Another thread panicked while holding the storage lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}
