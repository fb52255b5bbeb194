//! Persistent client storage.
//!
//! The storefront keeps exactly two values between runs: the local fallback
//! cart and the session credential. Both live in a flat string key-value
//! store, the way a browser's local storage holds them, behind the
//! [`ClientStorage`] trait so tests can swap the file-backed store for an
//! in-memory one.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys.
pub mod keys {
    /// Key for the serialized local fallback cart.
    pub const LOCAL_CART: &str = "localbite_cart";

    /// Key for the bearer token string.
    pub const ACCESS_TOKEN: &str = "access_token";
}

/// Errors that can occur when reading or writing client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string key-value store that survives restarts.
pub trait ClientStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// A value persisted as JSON under a fixed key.
pub trait StoredValue: Sized {
    const KEY: &'static str;

    /// Load and decode the value, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the stored JSON does
    /// not decode.
    fn load(storage: &impl ClientStorage) -> Result<Option<Self>, StorageError>
    where
        Self: DeserializeOwned,
    {
        storage
            .get(Self::KEY)?
            .map(|raw| serde_json::from_str(&raw).map_err(StorageError::from))
            .transpose()
    }

    /// Encode and store the whole value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn save(&self, storage: &mut impl ClientStorage) -> Result<(), StorageError>
    where
        Self: Serialize,
    {
        let raw = serde_json::to_string(self)?;
        storage.set(Self::KEY, &raw)
    }

    /// Remove the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete(storage: &mut impl ClientStorage) -> Result<(), StorageError> {
        storage.remove(Self::KEY)
    }
}
