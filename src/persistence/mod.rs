//! Key/value persistence
//!
//! Backends:
//! - `LocalStorageStore` on the web (wasm32)
//! - `FileStore` on native: one JSON file per key, written via tmp + rename
//! - `MemoryStore` for tests and throwaway sessions
//!
//! Callers treat every failure as recoverable: unreadable data means "start fresh".

use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

/// Storage failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backend could not be reached (no window, storage disabled, ...)
    Unavailable,
    /// Key contains characters the backend cannot store
    InvalidKey { key: String },
    /// Read/write failed
    Io { key: String, message: String },
    /// Value could not be encoded
    Serialize(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::InvalidKey { key } => write!(f, "invalid storage key {:?}", key),
            Self::Io { key, message } => write!(f, "storage i/o error on {:?}: {}", key, message),
            Self::Serialize(message) => write!(f, "serialization failed: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

/// Flat string key/value store (LocalStorage semantics)
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` if the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value (no-op if missing)
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Keys are restricted so every backend can store them verbatim (file names included)
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}
