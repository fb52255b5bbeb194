//! View models and HTML templates.
//!
//! Rendering is a pure function of [`PageView`]: the controller builds the
//! page model after every event, and each region is rendered by its own
//! template so hosts can re-render one fragment at a time.
//!
//! ```text
//! page.html
//! ├── partials/categories.html     CategoriesTemplate
//! ├── partials/product_grid.html   ProductGridTemplate
//! ├── partials/cart_count.html     CartCountTemplate
//! ├── partials/cart_items.html     CartItemsTemplate
//! ├── partials/totals.html         TotalsTemplate
//! ├── partials/product_detail.html ProductDetailTemplate
//! └── partials/notices.html        NoticesTemplate
//! ```

use askama::Template;

use myshop_core::{CartLine, CartMode, Category, CategoryId, Product, Review, Totals};

use crate::detail::ProductDetail;
use crate::filters;

// =============================================================================
// View Models
// =============================================================================

/// Category button display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub active: bool,
    /// Another category is active.
    pub dimmed: bool,
}

impl CategoryView {
    /// Build the category bar for the given active filter.
    #[must_use]
    pub fn bar(categories: &[Category], active: Option<CategoryId>) -> Vec<Self> {
        categories
            .iter()
            .map(|c| Self {
                id: c.id,
                name: c.name.clone(),
                active: active == Some(c.id),
                dimmed: active.is_some_and(|a| a != c.id),
            })
            .collect()
    }
}

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub rating: String,
    /// Price the shopper pays.
    pub price: String,
    /// Struck-through list price, when discounted.
    pub original_price: Option<String>,
    pub discount_percent: Option<i64>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let discount = product.active_discount();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.short_description(),
            image: product.image().to_string(),
            rating: product.rating_label(),
            price: discount.unwrap_or(product.price).display(),
            original_price: discount.map(|_| product.price.display()),
            discount_percent: product.discount_percent(),
        }
    }
}

/// Cart sidebar row display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            line_total: line.line_total().display_fixed(),
        }
    }
}

/// Cart sidebar body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemsView {
    pub lines: Vec<CartLineView>,
    /// Shown instead of lines.
    pub message: Option<String>,
}

impl CartItemsView {
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        if lines.is_empty() {
            return Self::empty();
        }
        Self {
            lines: lines.iter().map(CartLineView::from).collect(),
            message: None,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            message: Some("Cart is empty.".to_string()),
        }
    }

    /// The authoritative cart could not be read.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            lines: Vec::new(),
            message: Some("Cart unavailable.".to_string()),
        }
    }
}

/// Cart totals display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsView {
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl From<Totals> for TotalsView {
    fn from(totals: Totals) -> Self {
        Self {
            subtotal: totals.subtotal.display_fixed(),
            tax: totals.tax.display_fixed(),
            total: totals.total.display_fixed(),
        }
    }
}

impl Default for TotalsView {
    fn default() -> Self {
        Self::from(Totals::default())
    }
}

/// Product modal display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetailView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub description: String,
    pub price: String,
    pub reviews: Vec<Review>,
    pub reviews_message: Option<String>,
}

impl From<&ProductDetail> for ProductDetailView {
    fn from(detail: &ProductDetail) -> Self {
        let product = &detail.product;
        Self {
            id: product.id.to_string(),
            title: detail.title().to_string(),
            image: product.image().to_string(),
            description: product.description().to_string(),
            price: product.detail_price_label(),
            reviews: detail.reviews.reviews().to_vec(),
            reviews_message: detail.reviews.message().map(str::to_string),
        }
    }
}

/// How a notice is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice-success",
            Self::Info => "notice-info",
            Self::Error => "notice-error",
        }
    }
}

/// A user-facing message produced by an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Every rendered region of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub query: String,
    pub categories: Vec<CategoryView>,
    pub categories_error: Option<String>,
    pub products: Vec<ProductCardView>,
    /// `<n> products loaded` or `Error: <message>`.
    pub catalog_indicator: Option<String>,
    pub catalog_error: bool,
    pub cart_count: u32,
    pub cart_mode: CartMode,
    pub cart_open: bool,
    pub cart_items: CartItemsView,
    pub totals: TotalsView,
    pub detail: Option<ProductDetailView>,
    pub notices: Vec<Notice>,
    pub diagnostics: Option<String>,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            query: String::new(),
            categories: Vec::new(),
            categories_error: None,
            products: Vec::new(),
            catalog_indicator: None,
            catalog_error: false,
            cart_count: 0,
            cart_mode: CartMode::Local,
            cart_open: false,
            cart_items: CartItemsView::empty(),
            totals: TotalsView::default(),
            detail: None,
            notices: Vec::new(),
            diagnostics: None,
        }
    }
}

impl PageView {
    /// Render the full HTML page.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render(&self) -> askama::Result<String> {
        PageTemplate {
            query: &self.query,
            cart_open: self.cart_open,
            cart_mode: self.cart_mode,
            catalog_indicator: self.catalog_indicator.as_deref(),
            catalog_error: self.catalog_error,
            diagnostics: self.diagnostics.as_deref(),
            categories_html: CategoriesTemplate {
                categories: &self.categories,
                error: self.categories_error.as_deref(),
            }
            .render()?,
            grid_html: ProductGridTemplate {
                products: &self.products,
            }
            .render()?,
            cart_count_html: CartCountTemplate {
                count: self.cart_count,
            }
            .render()?,
            cart_items_html: CartItemsTemplate {
                cart: &self.cart_items,
            }
            .render()?,
            totals_html: TotalsTemplate {
                totals: &self.totals,
            }
            .render()?,
            detail_html: match &self.detail {
                Some(detail) => ProductDetailTemplate { detail }.render()?,
                None => String::new(),
            },
            notices_html: NoticesTemplate {
                notices: &self.notices,
            }
            .render()?,
        }
        .render()
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Full page.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate<'a> {
    pub query: &'a str,
    pub cart_open: bool,
    pub cart_mode: CartMode,
    pub catalog_indicator: Option<&'a str>,
    pub catalog_error: bool,
    pub diagnostics: Option<&'a str>,
    pub categories_html: String,
    pub grid_html: String,
    pub cart_count_html: String,
    pub cart_items_html: String,
    pub totals_html: String,
    pub detail_html: String,
    pub notices_html: String,
}

/// Category bar fragment.
#[derive(Template)]
#[template(path = "partials/categories.html")]
pub struct CategoriesTemplate<'a> {
    pub categories: &'a [CategoryView],
    pub error: Option<&'a str>,
}

/// Product grid fragment.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate<'a> {
    pub products: &'a [ProductCardView],
}

/// Cart count badge fragment.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Cart sidebar body fragment.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate<'a> {
    pub cart: &'a CartItemsView,
}

/// Cart totals fragment.
#[derive(Template)]
#[template(path = "partials/totals.html")]
pub struct TotalsTemplate<'a> {
    pub totals: &'a TotalsView,
}

/// Product modal fragment.
#[derive(Template)]
#[template(path = "partials/product_detail.html")]
pub struct ProductDetailTemplate<'a> {
    pub detail: &'a ProductDetailView,
}

/// Notices fragment.
#[derive(Template)]
#[template(path = "partials/notices.html")]
pub struct NoticesTemplate<'a> {
    pub notices: &'a [Notice],
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(value: serde_json::Value) -> Product {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_discounted_card() {
        let card = ProductCardView::from(&product(serde_json::json!({
            "id": 7, "name": "Masala Chai", "price": 500, "discount_price": 399,
            "description": "A warming blend of black tea, cardamom, ginger, cinnamon and cloves.",
            "rating": 4.25
        })));
        assert_eq!(card.price, "₹399");
        assert_eq!(card.original_price.as_deref(), Some("₹500"));
        assert_eq!(card.discount_percent, Some(20));
        assert_eq!(card.rating, "4.3");
        assert_eq!(card.description.chars().count(), 60);
        assert_eq!(card.image, "o2_featured_v2.avif");

        let html = ProductGridTemplate {
            products: &[card],
        }
        .render()
        .unwrap();
        assert!(html.contains("20% OFF"));
        assert!(html.contains("₹399"));
    }

    #[test]
    fn test_plain_card() {
        let card = ProductCardView::from(&product(serde_json::json!({
            "id": 1, "name": "Teapot", "price": "12.5", "discount_price": 0,
            "image_url": "teapot.avif"
        })));
        assert_eq!(card.price, "₹12.5");
        assert_eq!(card.original_price, None);
        assert_eq!(card.discount_percent, None);
        assert_eq!(card.rating, "0.0");
        assert_eq!(card.image, "teapot.avif");
    }

    #[test]
    fn test_category_bar_marks_active() {
        let categories = vec![
            Category {
                id: CategoryId::new(1),
                name: "Tea".to_string(),
            },
            Category {
                id: CategoryId::new(2),
                name: "Coffee".to_string(),
            },
        ];

        let bar = CategoryView::bar(&categories, None);
        assert!(bar.iter().all(|c| !c.active && !c.dimmed));

        let bar = CategoryView::bar(&categories, Some(CategoryId::new(2)));
        assert!(!bar[0].active && bar[0].dimmed);
        assert!(bar[1].active && !bar[1].dimmed);
    }

    #[test]
    fn test_cart_items_messages() {
        let html = CartItemsTemplate {
            cart: &CartItemsView::from_lines(&[]),
        }
        .render()
        .unwrap();
        assert!(html.contains("Cart is empty."));

        let html = CartItemsTemplate {
            cart: &CartItemsView::unavailable(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Cart unavailable."));
    }

    #[test]
    fn test_page_escapes_user_text() {
        let page = PageView {
            query: "<script>".to_string(),
            notices: vec![Notice::error("Checkout failed: <b>nope</b>")],
            ..PageView::default()
        };
        let html = page.render().unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>nope</b>"));
        assert!(html.contains("Cart is empty."));
        assert!(html.contains("₹0.00"));
    }
}
