//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MYSHOP_API_BASE_URL` - Backend base URL (default: `http://localhost:10000`)
//! - `MYSHOP_DATA_DIR` - Directory holding the client storage file (default: `.myshop`)
//! - `MYSHOP_PAYMENT_METHOD` - Payment method sent with checkout (default: `online`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:10000";
const DEFAULT_DATA_DIR: &str = ".myshop";
const DEFAULT_PAYMENT_METHOD: &str = "online";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Base URL of the backend API (paths like `/api/products` are joined onto it)
    pub api_base_url: Url,
    /// Directory for the persisted client storage
    pub data_dir: PathBuf,
    /// Payment method sent with checkout requests
    pub payment_method: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_base_url = parse_base_url(&get("MYSHOP_API_BASE_URL", DEFAULT_API_BASE_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("MYSHOP_API_BASE_URL".to_string(), e))?;
        let data_dir = PathBuf::from(get("MYSHOP_DATA_DIR", DEFAULT_DATA_DIR));
        let payment_method = get("MYSHOP_PAYMENT_METHOD", DEFAULT_PAYMENT_METHOD);

        Ok(Self {
            api_base_url,
            data_dir,
            payment_method,
        })
    }

    /// Replace the backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be used as a base.
    pub fn with_api_base_url(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(base)
            .map_err(|e| ConfigError::InvalidEnvVar("MYSHOP_API_BASE_URL".to_string(), e))?;
        Ok(self)
    }
}

/// Parse a base URL, normalizing it to end with `/` so relative joins keep
/// any path prefix.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("must be an absolute http(s) URL".to_string());
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
