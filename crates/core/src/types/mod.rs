//! Core types for MyShop.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod review;
pub mod status;

pub use cart::{CartLine, Quantity, QuantityError, TAX_RATE, Totals};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, round_half_up};
pub use product::{Category, Product, null_as_default};
pub use review::{RawReview, Review, ReviewsField};
pub use status::CartMode;
