use tracing::{info, instrument, warn};

use myshop_core::{CartLine, CartMode, Price, Product, ProductId, Quantity, Totals};

use super::{AddOutcome, CartSnapshot, CheckoutOutcome, LocalCart, MISSING_PRODUCT_NAME};
use crate::api::{ApiClient, ServerCart};
use crate::error::{Result, StorefrontError};
use crate::session::SessionCredential;
use crate::storage::{ClientStorage, StoredValue};

/// Reconciles cart operations between the server cart and the local
/// fallback cart.
///
/// The credential is re-read from storage on every call, so signing in or
/// out switches the authoritative store immediately.
#[derive(Debug)]
pub struct CartSynchronizer<S> {
    api: ApiClient,
    storage: S,
}

impl<S: ClientStorage> CartSynchronizer<S> {
    #[must_use]
    pub const fn new(api: ApiClient, storage: S) -> Self {
        Self { api, storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// The stored session credential, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn credential(&self) -> Result<Option<SessionCredential>> {
        Ok(SessionCredential::load(&self.storage)?)
    }

    /// Which store is authoritative right now.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn mode(&self) -> Result<CartMode> {
        Ok(CartMode::from_credential(self.credential()?.is_some()))
    }

    /// The persisted local cart.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn local_cart(&self) -> Result<LocalCart> {
        Ok(LocalCart::load_or_empty(&self.storage)?)
    }

    /// Add `quantity` units of a product.
    ///
    /// With a credential the server cart is tried first; if that request
    /// fails the units go to the local cart instead.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidQuantity`] for zero without
    /// touching either store, or a storage error if the local cart cannot
    /// be saved.
    #[instrument(skip(self))]
    pub async fn add_item(&mut self, product_id: ProductId, quantity: u32) -> Result<AddOutcome> {
        let quantity = Quantity::new(quantity)?;

        let outcome = match self.credential()? {
            Some(credential) => match self.api.add_to_cart(&credential, product_id, quantity).await {
                Ok(()) => {
                    info!(%product_id, "Added to server cart");
                    return Ok(AddOutcome::Server);
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        %product_id,
                        "Server cart add failed, falling back to local cart"
                    );
                    AddOutcome::LocalAfterServerFailure
                }
            },
            None => AddOutcome::Local,
        };

        let mut cart = self.local_cart()?;
        let qty = cart.add(product_id, quantity);
        cart.save(&mut self.storage)?;
        info!(%product_id, qty, "Added to local cart");
        Ok(outcome)
    }

    /// Read the authoritative cart, resolving local entries against
    /// `products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cart cannot be fetched (credential
    /// present) or storage cannot be read.
    #[instrument(skip_all)]
    pub async fn snapshot(&self, products: &[Product]) -> Result<CartSnapshot> {
        match self.credential()? {
            Some(credential) => {
                let cart = self.api.cart(&credential).await?;
                Ok(CartSnapshot {
                    mode: CartMode::Server,
                    lines: server_lines(&cart),
                })
            }
            None => Ok(CartSnapshot {
                mode: CartMode::Local,
                lines: self.local_cart()?.lines(products),
            }),
        }
    }

    /// Number of units in the authoritative cart.
    ///
    /// # Errors
    ///
    /// See [`Self::snapshot`].
    pub async fn count(&self, products: &[Product]) -> Result<u32> {
        Ok(self.snapshot(products).await?.count())
    }

    /// Sidebar lines of the authoritative cart.
    ///
    /// # Errors
    ///
    /// See [`Self::snapshot`].
    pub async fn lines(&self, products: &[Product]) -> Result<Vec<CartLine>> {
        Ok(self.snapshot(products).await?.lines)
    }

    /// Subtotal, tax, and total of the authoritative cart.
    ///
    /// # Errors
    ///
    /// See [`Self::snapshot`].
    pub async fn totals(&self, products: &[Product]) -> Result<Totals> {
        Ok(self.snapshot(products).await?.totals())
    }

    /// Place an order for the server cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::SignInRequired`] without contacting the
    /// backend when no credential is stored, or an API error when the
    /// request fails or the answer cannot be read.
    #[instrument(skip(self))]
    pub async fn checkout(&self, payment_method: &str) -> Result<CheckoutOutcome> {
        let credential = self.credential()?.ok_or(StorefrontError::SignInRequired)?;
        let response = self.api.checkout(&credential, payment_method).await?;

        if response.ok {
            let invoice = response.invoice.unwrap_or_default();
            info!(order_id = ?response.order_id, %invoice, "Order placed");
            Ok(CheckoutOutcome::Placed { invoice })
        } else {
            warn!(error = ?response.error, "Checkout refused");
            Ok(CheckoutOutcome::Refused {
                error: response.error.filter(|e| !e.is_empty()),
            })
        }
    }
}

/// Server lines take name and unit price from the embedded product; a
/// deleted product shows as `--` at price zero.
fn server_lines(cart: &ServerCart) -> Vec<CartLine> {
    cart.items
        .iter()
        .map(|item| {
            let product = item.product.as_ref();
            CartLine {
                product_id: product.map(|p| p.id),
                name: product
                    .map(|p| p.name.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| MISSING_PRODUCT_NAME.to_string()),
                unit_price: product.map_or(Price::ZERO, |p| p.price),
                quantity: item.quantity,
            }
        })
        .collect()
}
