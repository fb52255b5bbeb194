//! MyShop Core - Shared domain types.
//!
//! This crate provides the types used across the MyShop storefront client:
//! - `storefront` - Catalog, cart synchronizer, views, and API client
//! - `cli` - Command-line host that drives the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Everything here can be tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, products, cart lines, totals, reviews, emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
