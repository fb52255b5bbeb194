//! HTTP client for the backend API.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use myshop_core::{Category, Email, Product, ProductId, Quantity};

use super::ApiError;
use super::types::{
    AddToCartRequest, CheckoutRequest, CheckoutResponse, HealthResponse, LoginRequest,
    LoginResponse, ReviewsResponse, ServerCart,
};
use crate::config::StorefrontConfig;
use crate::session::SessionCredential;

/// How much of a response body goes into error logs.
const LOG_BODY_CHARS: usize = 500;

/// Client for the MyShop backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the configured backend.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
            }),
        }
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and return the status with the raw body.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Backend responded");
        Ok((status, body))
    }

    /// Send a request whose body is only meaningful on success.
    async fn send_expecting_success(
        &self,
        request: RequestBuilder,
    ) -> Result<String, ApiError> {
        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let body = self
            .send_expecting_success(self.inner.client.get(url))
            .await?;
        parse(&body)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// unexpected body.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("api/products").await
    }

    /// Fetch every category.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// unexpected body.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_json("api/categories").await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for a non-success status (404 for an
    /// unknown id), otherwise transport or parse errors.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("api/products/{id}")).await
    }

    /// Fetch reviews for an external catalog id. The body is read whatever
    /// the status, since failures arrive as `{ok: false, error}`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a body that is not a
    /// reviews envelope.
    #[instrument(skip(self))]
    pub async fn reviews(&self, asin: &str) -> Result<ReviewsResponse, ApiError> {
        let mut url = self.endpoint("api/reviews")?;
        url.query_pairs_mut().append_pair("asin", asin);
        let (_, body) = self.send(self.inner.client.get(url)).await?;
        parse(&body)
    }

    /// Probe the backend. The body is read whatever the status.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected body.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint("api/test")?;
        let (_, body) = self.send(self.inner.client.get(url)).await?;
        parse(&body)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status (an
    /// expired token yields 401), or an unexpected body.
    #[instrument(skip_all)]
    pub async fn cart(&self, credential: &SessionCredential) -> Result<ServerCart, ApiError> {
        let url = self.endpoint("api/cart")?;
        let body = self
            .send_expecting_success(self.inner.client.get(url).bearer_auth(credential.expose()))
            .await?;
        parse(&body)
    }

    /// Add a line to the server cart. Success is the HTTP status alone; the
    /// body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-success status.
    #[instrument(skip(self, credential))]
    pub async fn add_to_cart(
        &self,
        credential: &SessionCredential,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("api/cart/add")?;
        let request = AddToCartRequest {
            product_id,
            quantity: quantity.get(),
        };
        self.send_expecting_success(
            self.inner
                .client
                .post(url)
                .bearer_auth(credential.expose())
                .json(&request),
        )
        .await?;
        Ok(())
    }

    /// Place an order for the server cart. The body is read whatever the
    /// status; callers inspect `ok`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unparseable body.
    #[instrument(skip(self, credential))]
    pub async fn checkout(
        &self,
        credential: &SessionCredential,
        payment_method: &str,
    ) -> Result<CheckoutResponse, ApiError> {
        let url = self.endpoint("api/checkout")?;
        let request = CheckoutRequest {
            payment_method: payment_method.to_string(),
        };
        let (_, body) = self
            .send(
                self.inner
                    .client
                    .post(url)
                    .bearer_auth(credential.expose())
                    .json(&request),
            )
            .await?;
        parse(&body)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Exchange an email and password for a session credential.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the backend's message when the
    /// credentials are refused, otherwise transport or parse errors.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<SessionCredential, ApiError> {
        let url = self.endpoint("api/login")?;
        let request = LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        let (_, body) = self.send(self.inner.client.post(url).json(&request)).await?;
        let response: LoginResponse = parse(&body)?;

        let credential = response
            .ok
            .then_some(response.access_token)
            .flatten()
            .and_then(SessionCredential::new);
        credential.ok_or_else(|| {
            ApiError::Rejected(
                response
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Login failed".to_string()),
            )
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}
