//! Page state owned by the storefront controller.

use myshop_core::{Category, CategoryId, Product, ProductId};

use crate::catalog;

/// Everything one page load knows about the catalog and the shopper's
/// filters.
///
/// Owned by [`Storefront`](crate::Storefront) and mutated only through its
/// events, so reads never race writes.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    products: Vec<Product>,
    categories: Vec<Category>,
    active_category: Option<CategoryId>,
    query: String,
}

impl AppState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every loaded product, in backend order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Every loaded category.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The selected category filter, if any.
    #[must_use]
    pub const fn active_category(&self) -> Option<CategoryId> {
        self.active_category
    }

    /// The search text in effect.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Look up a loaded product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The products that pass the current query and category filter.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        catalog::apply_filter(&self.products, &self.query, self.active_category)
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub const fn set_active_category(&mut self, category: Option<CategoryId>) {
        self.active_category = category;
    }
}
