//! Catalog types as served by `/api/products` and `/api/categories`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::{Price, round_half_up};

/// Image shown when a product has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "o2_featured_v2.avif";

/// Number of description characters shown on a product card.
pub const CARD_DESCRIPTION_CHARS: usize = 60;

/// Read a JSON `null` the same as a missing field.
///
/// # Errors
///
/// Returns the deserializer's error for any other ill-typed value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product in the catalog.
///
/// Immutable from the client's perspective: the whole list is fetched again
/// on every page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Legacy rows may carry `null`, read as zero.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Price,
    #[serde(default)]
    pub discount_price: Option<Price>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    /// External catalog identifier used to look up reviews.
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl Product {
    /// Description, or the empty string when the backend sent none.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// The first characters of the description, as shown on cards.
    #[must_use]
    pub fn short_description(&self) -> String {
        self.description().chars().take(CARD_DESCRIPTION_CHARS).collect()
    }

    /// Image reference, falling back to the placeholder for missing or
    /// empty values.
    #[must_use]
    pub fn image(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => PLACEHOLDER_IMAGE,
        }
    }

    /// Rating with one decimal; unrated products show `0.0`.
    #[must_use]
    pub fn rating_label(&self) -> String {
        let rating = round_half_up(self.rating.unwrap_or_default(), 1);
        format!("{rating:.1}")
    }

    /// The discounted price, if one is in effect.
    ///
    /// A zero discount price counts as no discount.
    #[must_use]
    pub fn active_discount(&self) -> Option<Price> {
        self.discount_price.filter(|d| !d.is_zero())
    }

    /// Whole-number discount percentage for products with an active
    /// discount: `round((price - discount) / price * 100)`.
    ///
    /// A zero list price yields `0` rather than dividing by zero.
    #[must_use]
    pub fn discount_percent(&self) -> Option<i64> {
        let discount = self.active_discount()?;
        let price = self.price.amount();
        if price.is_zero() {
            return Some(0);
        }
        let pct = (price - discount.amount()) / price * Decimal::ONE_HUNDRED;
        Some(round_half_up(pct, 0).to_i64().unwrap_or(0))
    }

    /// Price text used in the product detail modal.
    #[must_use]
    pub fn detail_price_label(&self) -> String {
        match self.active_discount() {
            Some(discount) => format!("{} (was {})", discount.display(), self.price.display()),
            None => self.price.display(),
        }
    }

    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lowercased; an empty needle matches.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description().to_lowercase().contains(needle)
    }

    /// Whether the product passes a category filter. Without a filter
    /// everything passes; with one, uncategorized products never do.
    #[must_use]
    pub fn in_category(&self, category: Option<CategoryId>) -> bool {
        category.is_none_or(|wanted| self.category_id == Some(wanted))
    }

    /// The identifier reviews are keyed by, if the product has one.
    #[must_use]
    pub fn reviews_key(&self) -> Option<&str> {
        self.asin.as_deref().filter(|asin| !asin.is_empty())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
