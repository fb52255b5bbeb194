//! Client for the MyShop backend JSON API.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; endpoints are joined onto the
//!   configured base URL
//! - Authenticated endpoints take the session credential as a bearer token
//! - No caching and no retries: every call goes to the backend
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products          - Product list
//! GET  /api/products/{id}     - Product detail
//! GET  /api/categories        - Category list
//! GET  /api/cart              - Cart contents (bearer)
//! POST /api/cart/add          - Add a line (bearer)
//! POST /api/checkout          - Place an order (bearer)
//! POST /api/login             - Exchange credentials for a token
//! GET  /api/reviews?asin=     - Reviews for an external product id
//! GET  /api/test              - Health probe
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use myshop_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config);
//! let products = client.products().await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", truncate(.body, 200))]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend processed the request and refused it (`{ok: false, error}`).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The backend's own error text, when the failure carried one.
    ///
    /// For status errors this is the `error` member of a JSON body.
    #[must_use]
    pub fn backend_message(&self) -> Option<String> {
        match self {
            Self::Rejected(message) => Some(message.clone()),
            Self::Status { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.error)
                .filter(|e| !e.is_empty()),
            _ => None,
        }
    }

    /// Whether the backend answered with the given status.
    #[must_use]
    pub fn is_status(&self, wanted: reqwest::StatusCode) -> bool {
        matches!(self, Self::Status { status, .. } if *status == wanted)
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
