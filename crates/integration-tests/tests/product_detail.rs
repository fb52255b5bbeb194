//! Product detail modal and reviews.

#![allow(clippy::unwrap_used)]

use myshop_core::ProductId;
use myshop_integration_tests::MockBackend;
use myshop_storefront::detail::ReviewsState;
use myshop_storefront::{MemoryStorage, Storefront};

async fn opened(backend: &MockBackend, id: i32) -> Storefront<MemoryStorage> {
    let mut shop = Storefront::new(backend.config().unwrap(), MemoryStorage::default());
    shop.on_open_product(ProductId::new(id)).await;
    shop
}

#[tokio::test]
async fn test_list_reviews_normalize() {
    let backend = MockBackend::start().await.unwrap();
    let shop = opened(&backend, 1).await;

    let detail = shop.page().detail.unwrap();
    assert_eq!(detail.title, "Masala Chai");
    assert_eq!(detail.price, "₹99 (was ₹120)");
    assert_eq!(detail.reviews_message, None);
    assert_eq!(detail.reviews[0].title, "Lovely");
    assert_eq!(detail.reviews[1].title, "Strong");
    assert_eq!(detail.reviews[1].body, "Needs milk");

    let reviews = backend
        .requests()
        .into_iter()
        .find(|r| r.path == "/api/reviews")
        .unwrap();
    assert_eq!(reviews.query.as_deref(), Some("asin=B0CHAI"));

    let html = shop.render_html().unwrap();
    assert!(html.contains("productDetailModal"));
    assert!(html.contains("Warming and fragrant"));
}

#[tokio::test]
async fn test_nested_reviews_normalize() {
    let backend = MockBackend::start().await.unwrap();
    let shop = opened(&backend, 2).await;

    let detail = shop.detail().unwrap();
    assert_eq!(detail.product.name, "Filter Coffee");
    let reviews = detail.reviews.reviews();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].title, "Perfect decoction");
    assert_eq!(reviews[0].body, "Just like home");
    assert_eq!(shop.page().detail.unwrap().price, "₹250");
}

#[tokio::test]
async fn test_empty_reviews() {
    let backend = MockBackend::start().await.unwrap();
    let shop = opened(&backend, 4).await;
    assert_eq!(
        shop.detail().unwrap().reviews.message(),
        Some("No reviews available.")
    );
}

#[tokio::test]
async fn test_declined_reviews_show_backend_error() {
    let backend = MockBackend::start().await.unwrap();
    let shop = opened(&backend, 5).await;
    assert_eq!(
        shop.detail().unwrap().reviews.message(),
        Some("Review service quota exceeded")
    );
}

#[tokio::test]
async fn test_product_without_asin_skips_reviews() {
    let backend = MockBackend::start().await.unwrap();
    let shop = opened(&backend, 3).await;

    let detail = shop.detail().unwrap();
    assert_eq!(detail.reviews, ReviewsState::NoSource);
    assert_eq!(backend.requests_to("/api/reviews"), 0);
    assert_eq!(
        shop.page().detail.unwrap().reviews_message.as_deref(),
        Some("No reviews data available for this product.")
    );
}

#[tokio::test]
async fn test_unreadable_reviews_are_unavailable() {
    let backend = MockBackend::start().await.unwrap();
    backend.data().reviews.insert(
        "B0CHAI".to_string(),
        (
            axum::http::StatusCode::OK,
            serde_json::json!({"ok": true, "reviews": 42}),
        ),
    );
    let shop = opened(&backend, 1).await;
    assert_eq!(
        shop.detail().unwrap().reviews.message(),
        Some("Reviews unavailable")
    );
}

#[tokio::test]
async fn test_missing_product_notice() {
    let backend = MockBackend::start().await.unwrap();
    let shop = opened(&backend, 404).await;

    assert!(shop.detail().is_none());
    assert_eq!(shop.notices()[0].text, "Product not found");
}

#[tokio::test]
async fn test_unreadable_product_notice() {
    let backend = MockBackend::start().await.unwrap();
    backend.data().garbage_product_detail = true;
    let shop = opened(&backend, 1).await;

    assert!(shop.detail().is_none());
    assert_eq!(shop.notices()[0].text, "Failed to load product");
}

#[tokio::test]
async fn test_add_from_modal_and_close() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = opened(&backend, 2).await;

    let id = shop.detail().unwrap().product.id;
    shop.on_add_to_cart(id, 1).await.unwrap();
    assert_eq!(shop.notices()[0].text, "Added to cart!");
    assert_eq!(shop.cart_count(), 1);

    shop.on_close_product();
    assert!(shop.detail().is_none());
}
