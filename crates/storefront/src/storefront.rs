//! The storefront controller.
//!
//! [`Storefront`] is the single owner of page state. Hosts feed it user
//! events; each event mutates state, performs its network calls, and leaves
//! the page model ready for [`Storefront::page`]. Every event takes
//! `&mut self`, so events never interleave.

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use myshop_core::{CartMode, CategoryId, Email, ProductId};

use crate::api::ApiClient;
use crate::cart::{AddOutcome, CartSynchronizer};
use crate::catalog::{self, CatalogLoad};
use crate::config::StorefrontConfig;
use crate::detail::{self, ProductDetail};
use crate::error::{Result, StorefrontError};
use crate::session::SessionCredential;
use crate::state::AppState;
use crate::storage::ClientStorage;
use crate::views::{
    CartItemsView, CategoryView, Notice, PageView, ProductCardView, ProductDetailView, TotalsView,
};

/// Page controller over a client storage backend.
#[derive(Debug)]
pub struct Storefront<S: ClientStorage> {
    config: StorefrontConfig,
    api: ApiClient,
    state: AppState,
    cart: CartSynchronizer<S>,
    catalog: CatalogLoad,
    detail: Option<ProductDetail>,
    cart_open: bool,
    cart_mode: CartMode,
    cart_count: u32,
    cart_items: CartItemsView,
    totals: TotalsView,
    notices: Vec<Notice>,
    diagnostics: Option<String>,
}

impl<S: ClientStorage> Storefront<S> {
    /// Create a controller. Nothing is fetched until [`Self::on_load`].
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: S) -> Self {
        let api = ApiClient::new(&config);
        Self {
            cart: CartSynchronizer::new(api.clone(), storage),
            api,
            config,
            state: AppState::new(),
            catalog: CatalogLoad::default(),
            detail: None,
            cart_open: false,
            cart_mode: CartMode::Local,
            cart_count: 0,
            cart_items: CartItemsView::empty(),
            totals: TotalsView::default(),
            notices: Vec::new(),
            diagnostics: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn cart(&self) -> &CartSynchronizer<S> {
        &self.cart
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.cart.storage()
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogLoad {
        &self.catalog
    }

    /// The open product modal, if any.
    #[must_use]
    pub const fn detail(&self) -> Option<&ProductDetail> {
        self.detail.as_ref()
    }

    /// The count shown on the cart badge.
    #[must_use]
    pub const fn cart_count(&self) -> u32 {
        self.cart_count
    }

    #[must_use]
    pub const fn cart_open(&self) -> bool {
        self.cart_open
    }

    #[must_use]
    pub const fn cart_items(&self) -> &CartItemsView {
        &self.cart_items
    }

    #[must_use]
    pub const fn totals(&self) -> &TotalsView {
        &self.totals
    }

    /// Notices produced since the last [`Self::take_notices`].
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn diagnostics(&self) -> Option<&str> {
        self.diagnostics.as_deref()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Page load: fetch the catalog, then the cart.
    #[instrument(skip(self))]
    pub async fn on_load(&mut self) {
        self.catalog = catalog::load_catalog(&self.api, &mut self.state).await;
        self.refresh().await;
    }

    /// Apply a search query. The category filter stays in effect.
    #[instrument(skip(self))]
    pub fn on_search(&mut self, query: &str) {
        self.state.set_query(query);
    }

    /// Toggle a category filter; clicking the active category clears it.
    #[instrument(skip(self))]
    pub fn on_category_click(&mut self, category: CategoryId) {
        let active = catalog::toggle_category(self.state.active_category(), category);
        self.state.set_active_category(active);
    }

    /// Add units of a product to the authoritative cart.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero quantity or when the local cart cannot be
    /// saved. Server failures are not errors: the line goes to the local
    /// cart and the outcome says so.
    #[instrument(skip(self))]
    pub async fn on_add_to_cart(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<AddOutcome> {
        match self.cart.add_item(product_id, quantity).await {
            Ok(outcome) => {
                let notice = match outcome {
                    AddOutcome::LocalAfterServerFailure => Notice::error(outcome.notice()),
                    AddOutcome::Server | AddOutcome::Local => Notice::success(outcome.notice()),
                };
                self.notices.push(notice);
                self.refresh().await;
                Ok(outcome)
            }
            Err(e) => {
                self.notices.push(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Open the product modal.
    ///
    /// Failures close nothing and leave a notice: `Product not found` for
    /// a non-success status, `Failed to load product` otherwise.
    #[instrument(skip(self))]
    pub async fn on_open_product(&mut self, product_id: ProductId) {
        match detail::load_product_detail(&self.api, product_id).await {
            Ok(detail) => self.detail = Some(detail),
            Err(StorefrontError::NotFound(_)) => {
                self.notices.push(Notice::error("Product not found"));
            }
            Err(e) => {
                warn!(error = %e, %product_id, "Failed to load product");
                self.notices.push(Notice::error("Failed to load product"));
            }
        }
    }

    pub fn on_close_product(&mut self) {
        self.detail = None;
    }

    /// Show or hide the cart sidebar; `None` flips it.
    pub fn on_toggle_cart(&mut self, force: Option<bool>) {
        self.cart_open = force.unwrap_or(!self.cart_open);
    }

    /// Close the product modal and the cart sidebar.
    pub fn on_escape(&mut self) {
        self.detail = None;
        self.cart_open = false;
    }

    /// Place an order for the server cart.
    ///
    /// Guests get `Please sign in to checkout` and no request is made.
    ///
    /// # Errors
    ///
    /// Returns an error only if storage cannot be read.
    #[instrument(skip(self))]
    pub async fn on_checkout(&mut self) -> Result<()> {
        let payment_method = self.config.payment_method.clone();
        match self.cart.checkout(&payment_method).await {
            Ok(outcome) if outcome.is_placed() => {
                self.notices.push(Notice::success(outcome.notice()));
                self.refresh().await;
                self.cart_open = false;
            }
            Ok(outcome) => self.notices.push(Notice::error(outcome.notice())),
            Err(StorefrontError::SignInRequired) => {
                self.notices
                    .push(Notice::info(StorefrontError::SignInRequired.user_message()));
            }
            Err(StorefrontError::Api(e)) => {
                warn!(error = %e, "Checkout request failed");
                self.notices.push(Notice::error("Checkout error"));
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Exchange credentials for a session and switch to the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid email (no request is made) or when
    /// the credential cannot be stored. A refused sign-in is a notice.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&mut self, email: &str, password: &SecretString) -> Result<()> {
        let email = match Email::parse(email) {
            Ok(email) => email,
            Err(e) => {
                let err = StorefrontError::from(e);
                self.notices.push(Notice::error(err.user_message()));
                return Err(err);
            }
        };

        match self.api.login(&email, password).await {
            Ok(credential) => {
                credential.store(self.cart.storage_mut())?;
                info!(%email, "Signed in");
                self.notices.push(Notice::success(format!("Signed in as {email}")));
                self.refresh().await;
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                let err = StorefrontError::from(e);
                self.notices
                    .push(Notice::error(format!("Sign-in failed: {}", err.user_message())));
            }
        }
        Ok(())
    }

    /// Forget the session credential and switch to the local cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    #[instrument(skip(self))]
    pub async fn sign_out(&mut self) -> Result<()> {
        SessionCredential::clear(self.cart.storage_mut())?;
        info!("Signed out");
        self.notices.push(Notice::info("Signed out"));
        self.refresh().await;
        Ok(())
    }

    /// Probe the backend and record the diagnostics line.
    #[instrument(skip(self))]
    pub async fn health(&mut self) {
        let status = match self.api.health().await {
            Ok(health) => format!("API OK ({} products)", health.products.unwrap_or(0)),
            Err(e) => {
                warn!(error = %e, "Health probe failed");
                format!("API Error: {e}")
            }
        };
        self.diagnostics = Some(status);
    }

    /// Re-read the authoritative cart into the badge, sidebar, and totals.
    ///
    /// When the cart cannot be read the sidebar says so and the badge and
    /// totals keep their previous values.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) {
        match self.cart.snapshot(self.state.products()).await {
            Ok(snapshot) => {
                self.cart_mode = snapshot.mode;
                self.cart_count = snapshot.count();
                self.totals = TotalsView::from(snapshot.totals());
                self.cart_items = CartItemsView::from_lines(&snapshot.lines);
            }
            Err(e) => {
                warn!(error = %e, "Cart unavailable");
                if let Ok(mode) = self.cart.mode() {
                    self.cart_mode = mode;
                }
                self.cart_items = CartItemsView::unavailable();
            }
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build the page model from current state.
    #[must_use]
    pub fn page(&self) -> PageView {
        PageView {
            query: self.state.query().to_string(),
            categories: CategoryView::bar(self.state.categories(), self.state.active_category()),
            categories_error: self.catalog.categories_error.clone(),
            products: self
                .state
                .visible_products()
                .into_iter()
                .map(ProductCardView::from)
                .collect(),
            catalog_indicator: self.catalog.products.label(),
            catalog_error: self.catalog.products.is_error(),
            cart_count: self.cart_count,
            cart_mode: self.cart_mode,
            cart_open: self.cart_open,
            cart_items: self.cart_items.clone(),
            totals: self.totals.clone(),
            detail: self.detail.as_ref().map(ProductDetailView::from),
            notices: self.notices.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// Render the full page.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render_html(&self) -> askama::Result<String> {
        self.page().render()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn offline() -> Storefront<MemoryStorage> {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "MYSHOP_API_BASE_URL").then(|| "http://127.0.0.1:9".to_string())
        })
        .unwrap();
        Storefront::new(config, MemoryStorage::default())
    }

    #[tokio::test]
    async fn test_load_failure_is_not_fatal() {
        let mut shop = offline();
        shop.on_load().await;

        assert!(shop.state().products().is_empty());
        assert!(shop.catalog().products.is_error());
        assert!(shop.catalog().categories_error.is_some());
        // Guest cart is local, so it still reads.
        assert_eq!(shop.cart_items().message.as_deref(), Some("Cart is empty."));

        let html = shop.render_html().unwrap();
        assert!(html.contains("Error: "));
    }

    #[tokio::test]
    async fn test_guest_checkout_notice() {
        let mut shop = offline();
        shop.on_checkout().await.unwrap();
        assert_eq!(shop.notices()[0].text, "Please sign in to checkout");
    }

    #[tokio::test]
    async fn test_guest_add_updates_badge_and_totals() {
        let mut shop = offline();
        let outcome = shop.on_add_to_cart(ProductId::new(7), 2).await.unwrap();
        assert_eq!(outcome, AddOutcome::Local);
        assert_eq!(shop.cart_count(), 2);
        // Not in the (empty) catalog: Unknown at zero.
        assert_eq!(shop.cart_items().lines[0].name, "Unknown");
        assert_eq!(shop.totals().total, "₹0.00");
        assert_eq!(shop.take_notices()[0].text, "Added to cart!");
        assert!(shop.notices().is_empty());
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let mut shop = offline();
        let result = shop.on_add_to_cart(ProductId::new(7), 0).await;
        assert!(matches!(result, Err(StorefrontError::InvalidQuantity(_))));
        assert_eq!(shop.cart_count(), 0);
        assert_eq!(shop.notices()[0].text, "Quantity must be at least 1");
    }

    #[tokio::test]
    async fn test_invalid_email_makes_no_request() {
        let mut shop = offline();
        let result = shop
            .sign_in("not-an-email", &SecretString::from("pw".to_string()))
            .await;
        assert!(matches!(result, Err(StorefrontError::InvalidEmail(_))));
        assert_eq!(shop.notices()[0].text, "Invalid email address");
    }

    #[tokio::test]
    async fn test_offline_health() {
        let mut shop = offline();
        shop.health().await;
        assert!(shop.diagnostics().unwrap().starts_with("API Error: "));
    }

    #[test]
    fn test_cart_toggle_and_escape() {
        let mut shop = offline();
        shop.on_toggle_cart(None);
        assert!(shop.cart_open());
        shop.on_toggle_cart(Some(true));
        assert!(shop.cart_open());
        shop.on_toggle_cart(None);
        assert!(!shop.cart_open());
        shop.on_toggle_cart(Some(true));
        shop.on_escape();
        assert!(!shop.cart_open());
        assert!(shop.detail().is_none());
    }

    #[test]
    fn test_filters_survive_category_toggle() {
        let mut shop = offline();
        shop.on_search("tea");
        shop.on_category_click(CategoryId::new(3));
        assert_eq!(shop.state().active_category(), Some(CategoryId::new(3)));
        shop.on_category_click(CategoryId::new(3));
        assert_eq!(shop.state().active_category(), None);
        assert_eq!(shop.state().query(), "tea");
    }
}
