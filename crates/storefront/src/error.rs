//! Unified error handling for storefront events.
//!
//! Every controller operation returns `Result<T, StorefrontError>`. The
//! [`StorefrontError::user_message`] mapping decides what the shopper sees,
//! keeping transport details in the logs.

use thiserror::Error;

use myshop_core::{EmailError, QuantityError};

use crate::api::ApiError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Client storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation needs a session credential and none is stored.
    #[error("Sign-in required")]
    SignInRequired,

    /// A cart quantity was not positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    /// A sign-in email failed validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorefrontError {
    /// The message shown to the shopper.
    ///
    /// Backend rejections carry the backend's own text; transport and
    /// storage failures get a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err
                .backend_message()
                .unwrap_or_else(|| "Network error, please try again".to_string()),
            Self::Storage(_) => "Could not save your data on this device".to_string(),
            Self::SignInRequired => "Please sign in to checkout".to_string(),
            Self::InvalidQuantity(_) => "Quantity must be at least 1".to_string(),
            Self::InvalidEmail(_) => "Invalid email address".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;
