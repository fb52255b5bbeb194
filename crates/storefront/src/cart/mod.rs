//! Cart synchronization.
//!
//! # Architecture
//!
//! - Two disjoint stores: the server cart (authoritative while a session
//!   credential is stored) and the local fallback cart (authoritative
//!   otherwise)
//! - The stores are never merged. An authenticated add that the server
//!   rejects lands in the local cart and stays there; it becomes visible
//!   again only after sign-out
//! - Count, sidebar lines, and totals are all derived from one
//!   [`CartSnapshot`] of the authoritative store

mod local;
mod sync;

pub use local::{LocalCart, LocalEntry};
pub use sync::CartSynchronizer;

use myshop_core::{CartLine, CartMode, Totals};

/// Name shown for a server line whose product no longer exists.
pub const MISSING_PRODUCT_NAME: &str = "--";

/// Name shown for a local line whose product is not in the loaded catalog.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

/// Where an added item ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The server accepted the line.
    Server,
    /// No credential; the line went to the local cart.
    Local,
    /// The server refused or was unreachable; the line went to the local
    /// cart instead and will not show while signed in.
    LocalAfterServerFailure,
}

impl AddOutcome {
    /// Notice shown to the shopper.
    #[must_use]
    pub const fn notice(self) -> &'static str {
        match self {
            Self::Server | Self::Local => "Added to cart!",
            Self::LocalAfterServerFailure => {
                "Added to cart on this device (the server cart could not be updated)"
            }
        }
    }
}

/// The authoritative cart at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub mode: CartMode,
    pub lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Sum of quantities across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::from_lines(&self.lines)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of a checkout the backend answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Order created.
    Placed { invoice: String },
    /// Backend refused; carries its error text when it sent one.
    Refused { error: Option<String> },
}

impl CheckoutOutcome {
    /// Notice shown to the shopper.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Placed { invoice } => format!("Order placed! Invoice: {invoice}"),
            Self::Refused { error } => format!(
                "Checkout failed: {}",
                error.as_deref().unwrap_or("Unknown error")
            ),
        }
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}
