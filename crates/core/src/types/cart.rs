//! Cart lines and totals.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, round_half_up};

/// Flat tax rate applied to every cart (5%).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Errors that can occur when creating a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Cart lines must hold at least one unit.
    #[error("quantity must be a positive integer")]
    Zero,
}

/// A positive number of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            Err(QuantityError::Zero)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Add another quantity, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One resolved cart line: what the sidebar shows and totals are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Subtotal, tax, and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
}

impl Totals {
    /// Compute totals from a subtotal: tax is the subtotal at [`TAX_RATE`]
    /// rounded to two decimals, total is subtotal plus tax.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        let tax = Price::new(round_half_up(subtotal.amount() * TAX_RATE, 2));
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// Totals over resolved cart lines.
    #[must_use]
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> Self {
        Self::from_subtotal(lines.into_iter().map(CartLine::line_total).sum())
    }
}
