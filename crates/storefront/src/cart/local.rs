//! Local fallback cart, persisted under [`keys::LOCAL_CART`].
//!
//! Stored as one JSON object keyed by product id:
//!
//! ```json
//! {"7": {"id": 7, "qty": 2}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use myshop_core::{CartLine, Price, Product, ProductId, Quantity};

use super::UNKNOWN_PRODUCT_NAME;
use crate::storage::{ClientStorage, StorageError, StoredValue, keys};

/// One local cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEntry {
    pub id: ProductId,
    #[serde(default)]
    pub qty: u32,
}

/// Product id to entry, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalCart {
    entries: BTreeMap<ProductId, LocalEntry>,
}

impl StoredValue for LocalCart {
    const KEY: &'static str = keys::LOCAL_CART;
}

impl LocalCart {
    /// Load the persisted cart. A stored value that does not decode is
    /// logged and treated as an empty cart; the next save overwrites it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load_or_empty(storage: &impl ClientStorage) -> Result<Self, StorageError> {
        match Self::load(storage) {
            Ok(cart) => Ok(cart.unwrap_or_default()),
            Err(StorageError::Json(e)) => {
                warn!(error = %e, "Ignoring unreadable local cart");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Add units of a product, creating the entry when absent. Returns the
    /// entry's new quantity.
    pub fn add(&mut self, id: ProductId, quantity: Quantity) -> u32 {
        let entry = self.entries.entry(id).or_insert(LocalEntry { id, qty: 0 });
        entry.qty = entry.qty.saturating_add(quantity.get());
        entry.qty
    }

    /// Quantity held for a product.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> Option<u32> {
        self.entries.get(&id).map(|entry| entry.qty)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LocalEntry> {
        self.entries.values()
    }

    /// Resolve entries against the loaded catalog. Products missing from
    /// the catalog show as `Unknown` at price zero.
    #[must_use]
    pub fn lines(&self, products: &[Product]) -> Vec<CartLine> {
        self.entries()
            .map(|entry| {
                let product = products.iter().find(|p| p.id == entry.id);
                CartLine {
                    product_id: Some(entry.id),
                    name: product.map_or_else(
                        || UNKNOWN_PRODUCT_NAME.to_string(),
                        |p| p.name.clone(),
                    ),
                    unit_price: product.map_or(Price::ZERO, |p| p.price),
                    quantity: entry.qty,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn catalog() -> Vec<Product> {
        serde_json::from_value(serde_json::json!([
            {"id": 7, "name": "Masala Chai", "price": 120, "discount_price": 99},
            {"id": 3, "name": "Teapot", "price": "12.5"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_add_accumulates() {
        let mut cart = LocalCart::default();
        assert_eq!(cart.add(ProductId::new(7), Quantity::ONE), 1);
        assert_eq!(cart.add(ProductId::new(7), Quantity::ONE), 2);
        assert_eq!(cart.add(ProductId::new(3), Quantity::new(3).unwrap()), 3);
        assert_eq!(cart.quantity(ProductId::new(7)), Some(2));
        assert_eq!(cart.quantity(ProductId::new(3)), Some(3));
    }

    #[test]
    fn test_persisted_shape() {
        let mut storage = MemoryStorage::default();
        let mut cart = LocalCart::default();
        cart.add(ProductId::new(7), Quantity::new(2).unwrap());
        cart.save(&mut storage).unwrap();

        assert_eq!(
            storage.get("localbite_cart").unwrap().as_deref(),
            Some(r#"{"7":{"id":7,"qty":2}}"#)
        );
        assert_eq!(LocalCart::load_or_empty(&storage).unwrap(), cart);
    }

    #[test]
    fn test_corrupt_cart_reads_as_empty() {
        let mut storage = MemoryStorage::default();
        storage.set("localbite_cart", "not json").unwrap();
        assert!(LocalCart::load_or_empty(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_lines_resolve_against_catalog() {
        let mut cart = LocalCart::default();
        cart.add(ProductId::new(7), Quantity::new(2).unwrap());
        cart.add(ProductId::new(3), Quantity::ONE);
        cart.add(ProductId::new(42), Quantity::ONE);

        let lines = cart.lines(&catalog());
        let names: Vec<_> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Teapot", "Masala Chai", "Unknown"]);

        // List price, not the discount price.
        assert_eq!(lines[1].line_total().display_fixed(), "₹240.00");
        assert_eq!(lines[0].line_total().display_fixed(), "₹12.50");
        assert!(lines[2].unit_price.is_zero());
    }
}
