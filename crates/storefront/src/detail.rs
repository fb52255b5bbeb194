//! Product detail modal and its reviews.

use tracing::{instrument, warn};

use myshop_core::{Product, ProductId, Review};

use crate::api::{ApiClient, ApiError, ReviewsResponse};
use crate::error::{Result, StorefrontError};

/// Title shown when a product has an empty name.
pub const DEFAULT_PRODUCT_TITLE: &str = "Product";

/// What the reviews section of the modal shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewsState {
    /// Normalized reviews, at least one.
    Loaded(Vec<Review>),
    /// The backend answered with an empty list.
    Empty,
    /// The backend declined; carries its error text when it sent one.
    Declined(Option<String>),
    /// The request failed or the body had an unknown shape.
    Unavailable,
    /// The product has no external id to look reviews up by.
    NoSource,
}

impl ReviewsState {
    /// Text shown in place of reviews, or `None` when there are reviews.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Empty => Some("No reviews available."),
            Self::Declined(error) => Some(error.as_deref().unwrap_or("Unable to fetch reviews.")),
            Self::Unavailable => Some("Reviews unavailable"),
            Self::NoSource => Some("No reviews data available for this product."),
        }
    }

    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        match self {
            Self::Loaded(reviews) => reviews,
            _ => &[],
        }
    }

    /// Interpret a reviews response body.
    #[must_use]
    pub fn from_response(response: ReviewsResponse) -> Self {
        let declined = || Self::Declined(response.error.clone().filter(|e| !e.is_empty()));
        if !response.ok {
            return declined();
        }
        let Some(field) = response.reviews.as_ref() else {
            return declined();
        };
        match field.records() {
            Some([]) => Self::Empty,
            Some(records) => Self::Loaded(records.iter().map(Review::normalize).collect()),
            None => {
                warn!("Reviews response has an unrecognized shape");
                Self::Unavailable
            }
        }
    }
}

/// An open product modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub product: Product,
    pub reviews: ReviewsState,
}

impl ProductDetail {
    /// Modal title.
    #[must_use]
    pub fn title(&self) -> &str {
        if self.product.name.is_empty() {
            DEFAULT_PRODUCT_TITLE
        } else {
            &self.product.name
        }
    }
}

/// Fetch a product and its reviews.
///
/// # Errors
///
/// Returns [`StorefrontError::NotFound`] when the backend answers with a
/// non-success status, or an API error on transport or parse failure.
/// Review failures never fail the modal.
#[instrument(skip(api))]
pub async fn load_product_detail(api: &ApiClient, id: ProductId) -> Result<ProductDetail> {
    let product = match api.product(id).await {
        Ok(product) => product,
        Err(ApiError::Status { status, .. }) => {
            warn!(%id, %status, "Product lookup failed");
            return Err(StorefrontError::NotFound("Product".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    let reviews = load_reviews(api, &product).await;
    Ok(ProductDetail { product, reviews })
}

/// Fetch reviews for a product. Products without an external id get
/// [`ReviewsState::NoSource`] and no request is made.
pub async fn load_reviews(api: &ApiClient, product: &Product) -> ReviewsState {
    let Some(asin) = product.reviews_key() else {
        return ReviewsState::NoSource;
    };
    match api.reviews(asin).await {
        Ok(response) => ReviewsState::from_response(response),
        Err(e) => {
            warn!(error = %e, asin, "Failed to load reviews");
            ReviewsState::Unavailable
        }
    }
}
