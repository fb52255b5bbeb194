//! Session credential.
//!
//! The bearer token is stored as a raw string under
//! [`keys::ACCESS_TOKEN`](crate::storage::keys::ACCESS_TOKEN). Its presence
//! alone decides which cart is authoritative; the client never inspects it.

use secrecy::{ExposeSecret, SecretString};

use crate::storage::{ClientStorage, StorageError, keys};

/// An opaque bearer token proving an authenticated shopper.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SessionCredential(SecretString);

impl SessionCredential {
    /// Wrap a token. Returns `None` for an empty token, which counts as no
    /// credential at all.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(SecretString::from(token)))
        }
    }

    /// The token, for building an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Read the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(storage: &impl ClientStorage) -> Result<Option<Self>, StorageError> {
        Ok(storage.get(keys::ACCESS_TOKEN)?.and_then(Self::new))
    }

    /// Persist this credential, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn store(&self, storage: &mut impl ClientStorage) -> Result<(), StorageError> {
        storage.set(keys::ACCESS_TOKEN, self.expose())
    }

    /// Forget the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(storage: &mut impl ClientStorage) -> Result<(), StorageError> {
        storage.remove(keys::ACCESS_TOKEN)
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCredential([REDACTED])")
    }
}
