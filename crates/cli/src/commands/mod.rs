//! Command implementations.
//!
//! Every command follows the same page lifecycle through [`PageHost`]:
//! open storage, load the catalog and cart, dispatch one event, then write
//! the page and print notices.

pub mod cart;
pub mod catalog;
pub mod session;

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use myshop_storefront::storage::StorageError;
use myshop_storefront::{ConfigError, FileStorage, Storefront, StorefrontConfig, StorefrontError};

use crate::GlobalArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The dispatched event failed.
    #[error("{}", .0.user_message())]
    Storefront(#[from] StorefrontError),

    /// The page could not be rendered.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The page could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve configuration from the environment and command-line overrides.
///
/// # Errors
///
/// Returns an error if a variable or override is invalid.
pub fn load_config(global: &GlobalArgs) -> Result<StorefrontConfig, CommandError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(base) = &global.api_base_url {
        config = config.with_api_base_url(base)?;
    }
    if let Some(dir) = &global.data_dir {
        config.data_dir.clone_from(dir);
    }
    Ok(config)
}

/// One page load driven from the command line.
pub struct PageHost {
    shop: Storefront<FileStorage>,
    out: PathBuf,
}

impl PageHost {
    /// Open storage and load the catalog and cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be opened.
    pub async fn open(config: StorefrontConfig, global: &GlobalArgs) -> Result<Self, CommandError> {
        let storage = FileStorage::open(&config.data_dir)?;
        info!(
            api = %config.api_base_url,
            storage = %storage.path().display(),
            "Opening storefront"
        );
        let mut shop = Storefront::new(config, storage);
        shop.on_load().await;
        Ok(Self {
            shop,
            out: global.out.clone(),
        })
    }

    /// Open with configuration resolved from `global`.
    ///
    /// # Errors
    ///
    /// See [`load_config`] and [`Self::open`].
    pub async fn from_args(global: &GlobalArgs) -> Result<Self, CommandError> {
        Self::open(load_config(global)?, global).await
    }

    pub const fn shop(&mut self) -> &mut Storefront<FileStorage> {
        &mut self.shop
    }

    /// Write the page and print notices, then pass through the event's
    /// result.
    ///
    /// # Errors
    ///
    /// Returns the event's error, or a render or write error.
    pub fn finish<T>(
        mut self,
        event: Result<T, StorefrontError>,
    ) -> Result<T, CommandError> {
        let html = self.shop.render_html()?;
        std::fs::write(&self.out, html).map_err(|source| CommandError::Write {
            path: self.out.display().to_string(),
            source,
        })?;
        info!(path = %self.out.display(), "Wrote page");

        for notice in self.shop.take_notices() {
            print_line(&notice.to_string());
        }
        Ok(event?)
    }
}

#[allow(clippy::print_stdout)]
pub fn print_line(line: &str) {
    println!("{line}");
}
