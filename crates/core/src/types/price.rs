//! Type-safe price representation using decimal arithmetic.
//!
//! The backend sends prices as JSON numbers (`499.0`, `12.5`). They are read
//! into [`Decimal`] so cart arithmetic never drifts the way binary floats do.

use core::fmt;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rupee sign used for every rendered amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// A price in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price, used for products that cannot be resolved.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format the amount as the backend sent it, without trailing zeros
    /// (e.g. `₹499`, `₹12.5`). Used on product cards.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{}", self.0.normalize())
    }

    /// Format with exactly two decimals (e.g. `₹12.50`). Used for cart rows
    /// and totals.
    #[must_use]
    pub fn display_fixed(&self) -> String {
        let rounded = round_half_up(self.0, 2);
        format!("{CURRENCY_SYMBOL}{rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Round to `dp` decimal places with halves rounded towards positive
/// infinity, the way `Math.round(x * 10^dp) / 10^dp` behaves in browsers.
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(dp, strategy)
}
