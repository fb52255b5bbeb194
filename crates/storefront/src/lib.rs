//! MyShop storefront library.
//!
//! The client-side presentation layer of the MyShop store: a catalog
//! renderer, a cart synchronizer that switches between the server cart and
//! a local fallback cart, and a product-detail modal with reviews. All data
//! comes from the backend JSON API; pages are rendered with Askama.
//!
//! # Example
//!
//! ```rust,ignore
//! use myshop_storefront::{FileStorage, Storefront, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let storage = FileStorage::open(&config.data_dir)?;
//! let mut shop = Storefront::new(config, storage);
//! shop.on_load().await;
//! shop.on_add_to_cart(ProductId::new(7), 1).await?;
//! std::fs::write("myshop.html", shop.render_html()?)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod filters;
pub mod session;
pub mod state;
pub mod storage;
pub mod storefront;
pub mod views;

pub use config::{ConfigError, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use session::SessionCredential;
pub use storage::{ClientStorage, FileStorage, MemoryStorage};
pub use storefront::Storefront;
