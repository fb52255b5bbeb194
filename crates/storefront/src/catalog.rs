//! Catalog loading and filtering.
//!
//! The catalog is fetched wholesale on every page load and filtered in
//! memory. Filtering always starts from the full list, so the visible grid
//! is a pure function of `(products, query, category)`.

use tracing::{info, instrument, warn};

use myshop_core::{CategoryId, Product};

use crate::api::ApiClient;
use crate::state::AppState;

/// Outcome of loading the product list, shown as the catalog indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    /// Nothing loaded yet.
    #[default]
    Pending,
    /// Products arrived; carries the count.
    Loaded(usize),
    /// Products could not be loaded; carries the error text.
    Failed(String),
}

impl CatalogStatus {
    /// Indicator text, or `None` before the first load.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Pending => None,
            Self::Loaded(count) => Some(format!("{count} products loaded")),
            Self::Failed(message) => Some(format!("Error: {message}")),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// What a catalog load produced besides the lists themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogLoad {
    pub products: CatalogStatus,
    /// Error text when categories failed to load.
    pub categories_error: Option<String>,
}

/// Fetch products and categories concurrently into `state`.
///
/// A failed list stays empty; the failure is logged and reported in the
/// returned [`CatalogLoad`] rather than aborting the page.
#[instrument(skip_all)]
pub async fn load_catalog(api: &ApiClient, state: &mut AppState) -> CatalogLoad {
    let (products, categories) = tokio::join!(api.products(), api.categories());

    let products = match products {
        Ok(products) => {
            info!(count = products.len(), "Loaded products");
            let status = CatalogStatus::Loaded(products.len());
            state.set_products(products);
            status
        }
        Err(e) => {
            warn!(error = %e, "Failed to load products");
            state.set_products(Vec::new());
            CatalogStatus::Failed(e.to_string())
        }
    };

    let categories_error = match categories {
        Ok(categories) => {
            state.set_categories(categories);
            None
        }
        Err(e) => {
            warn!(error = %e, "Failed to load categories");
            state.set_categories(Vec::new());
            Some(e.to_string())
        }
    };

    CatalogLoad {
        products,
        categories_error,
    }
}

/// The products matching `query` and `category`, in input order.
///
/// The query is trimmed and compared case-insensitively against name and
/// description; an empty query matches everything. An active category
/// requires an exact match.
#[must_use]
pub fn apply_filter<'a>(
    products: &'a [Product],
    query: &str,
    category: Option<CategoryId>,
) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| p.in_category(category))
        .filter(|p| p.matches_query(&needle))
        .collect()
}

/// Single-select-or-none category toggle: clicking the active category
/// clears the filter, any other click selects it.
#[must_use]
pub fn toggle_category(active: Option<CategoryId>, clicked: CategoryId) -> Option<CategoryId> {
    if active == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}
