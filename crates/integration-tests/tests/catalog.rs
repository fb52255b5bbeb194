//! Catalog loading, filtering, and rendering against the mock backend.

#![allow(clippy::unwrap_used)]

use myshop_core::CategoryId;
use myshop_integration_tests::MockBackend;
use myshop_storefront::{MemoryStorage, Storefront};

async fn loaded(backend: &MockBackend) -> Storefront<MemoryStorage> {
    let mut shop = Storefront::new(backend.config().unwrap(), MemoryStorage::default());
    shop.on_load().await;
    shop
}

fn visible_names(shop: &Storefront<MemoryStorage>) -> Vec<String> {
    shop.page().products.into_iter().map(|card| card.name).collect()
}

#[tokio::test]
async fn test_load_fetches_products_and_categories() {
    let backend = MockBackend::start().await.unwrap();
    let shop = loaded(&backend).await;

    assert_eq!(backend.requests_to("/api/products"), 1);
    assert_eq!(backend.requests_to("/api/categories"), 1);
    assert_eq!(shop.state().products().len(), 5);
    assert_eq!(shop.state().categories().len(), 2);

    let page = shop.page();
    assert_eq!(page.catalog_indicator.as_deref(), Some("5 products loaded"));
    assert!(!page.catalog_error);
}

#[tokio::test]
async fn test_search_and_category_filters_combine() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = loaded(&backend).await;

    shop.on_search("TEA");
    assert_eq!(
        visible_names(&shop),
        ["Masala Chai", "Teapot", "Green Tea"]
    );

    shop.on_category_click(CategoryId::new(1));
    assert_eq!(visible_names(&shop), ["Masala Chai", "Green Tea"]);

    // Clicking the active category clears it; the query stays.
    shop.on_category_click(CategoryId::new(1));
    assert_eq!(
        visible_names(&shop),
        ["Masala Chai", "Teapot", "Green Tea"]
    );

    shop.on_search("");
    assert_eq!(visible_names(&shop).len(), 5);

    // Filtering never goes back to the network.
    assert_eq!(backend.requests_to("/api/products"), 1);
}

#[tokio::test]
async fn test_cards_show_discount_and_placeholders() {
    let backend = MockBackend::start().await.unwrap();
    let shop = loaded(&backend).await;
    let page = shop.page();

    let chai = &page.products[0];
    assert_eq!(chai.price, "₹99");
    assert_eq!(chai.original_price.as_deref(), Some("₹120"));
    // (120 - 99) / 120 = 17.5% rounds up.
    assert_eq!(chai.discount_percent, Some(18));
    assert_eq!(chai.rating, "4.6");
    assert_eq!(chai.image, "o2_featured_v2.avif");

    let teapot = &page.products[2];
    assert_eq!(teapot.price, "₹12.5");
    assert_eq!(teapot.description, "");
    assert_eq!(teapot.rating, "0.0");

    let html = shop.render_html().unwrap();
    assert!(html.contains("18% OFF"));
    assert!(html.contains("coffee.avif"));
    assert!(html.contains("5 products loaded"));
}

#[tokio::test]
async fn test_products_failure_shows_indicator() {
    let backend = MockBackend::start().await.unwrap();
    backend.data().fail_products = true;
    let shop = loaded(&backend).await;

    assert!(shop.state().products().is_empty());
    assert_eq!(shop.state().categories().len(), 2);

    let page = shop.page();
    assert!(page.catalog_error);
    let indicator = page.catalog_indicator.unwrap();
    assert!(indicator.starts_with("Error: "), "{indicator}");
    assert!(indicator.contains("500"), "{indicator}");
    assert!(page.products.is_empty());
}

#[tokio::test]
async fn test_categories_failure_keeps_products() {
    let backend = MockBackend::start().await.unwrap();
    backend.data().fail_categories = true;
    let shop = loaded(&backend).await;

    assert_eq!(shop.state().products().len(), 5);
    assert!(shop.state().categories().is_empty());
    assert!(shop.catalog().categories_error.is_some());
    assert!(shop.render_html().unwrap().contains("Categories unavailable"));
}

#[tokio::test]
async fn test_health_reports_product_count() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = Storefront::new(backend.config().unwrap(), MemoryStorage::default());
    shop.health().await;

    assert_eq!(shop.diagnostics(), Some("API OK (5 products)"));
    assert!(shop.render_html().unwrap().contains("API OK (5 products)"));
}

#[tokio::test]
async fn test_null_price_row_does_not_blank_the_catalog() {
    let backend = MockBackend::start().await.unwrap();
    backend.data().products.push(serde_json::json!({
        "id": 6, "name": "Legacy Kettle", "description": null, "price": null
    }));
    let shop = loaded(&backend).await;

    let page = shop.page();
    assert_eq!(page.catalog_indicator.as_deref(), Some("6 products loaded"));
    let kettle = page.products.iter().find(|c| c.name == "Legacy Kettle").unwrap();
    assert_eq!(kettle.price, "₹0");
}
