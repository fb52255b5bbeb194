//! Cart synchronization: local fallback, server cart, and the divergence
//! between them.

#![allow(clippy::unwrap_used)]

use myshop_core::{CartMode, ProductId};
use myshop_integration_tests::{MockBackend, SHOPPER_TOKEN};
use myshop_storefront::cart::{AddOutcome, LocalCart};
use myshop_storefront::{ClientStorage, FileStorage, MemoryStorage, SessionCredential, Storefront};

async fn guest(backend: &MockBackend) -> Storefront<MemoryStorage> {
    let mut shop = Storefront::new(backend.config().unwrap(), MemoryStorage::default());
    shop.on_load().await;
    shop
}

async fn signed_in(backend: &MockBackend) -> Storefront<MemoryStorage> {
    let mut storage = MemoryStorage::default();
    SessionCredential::new(SHOPPER_TOKEN)
        .unwrap()
        .store(&mut storage)
        .unwrap();
    let mut shop = Storefront::new(backend.config().unwrap(), storage);
    shop.on_load().await;
    shop
}

#[tokio::test]
async fn test_guest_adds_accumulate_and_persist() {
    let backend = MockBackend::start().await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = FileStorage::open(dir.path()).unwrap();
        let mut shop = Storefront::new(backend.config().unwrap(), storage);
        shop.on_load().await;

        assert_eq!(
            shop.on_add_to_cart(ProductId::new(1), 1).await.unwrap(),
            AddOutcome::Local
        );
        shop.on_add_to_cart(ProductId::new(1), 1).await.unwrap();
        assert_eq!(shop.cart_count(), 2);
    }

    // A fresh page load over the same directory sees the same cart.
    let storage = FileStorage::open(dir.path()).unwrap();
    let cart = LocalCart::load_or_empty(&storage).unwrap();
    assert_eq!(cart.quantity(ProductId::new(1)), Some(2));
    assert_eq!(
        storage.get("localbite_cart").unwrap().as_deref(),
        Some(r#"{"1":{"id":1,"qty":2}}"#)
    );

    let mut shop = Storefront::new(backend.config().unwrap(), storage);
    shop.on_load().await;
    assert_eq!(shop.cart_count(), 2);

    // Guests never touch the server cart.
    assert_eq!(backend.requests_to("/api/cart"), 0);
    assert_eq!(backend.requests_to("/api/cart/add"), 0);
}

#[tokio::test]
async fn test_guest_totals_use_list_price() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = guest(&backend).await;

    // Masala Chai is discounted to 99 but totals use the list price 120.
    shop.on_add_to_cart(ProductId::new(1), 2).await.unwrap();
    shop.on_add_to_cart(ProductId::new(3), 1).await.unwrap();
    shop.on_add_to_cart(ProductId::new(99), 1).await.unwrap();

    let items = shop.cart_items();
    let rows: Vec<_> = items
        .lines
        .iter()
        .map(|l| (l.name.as_str(), l.line_total.as_str()))
        .collect();
    assert_eq!(
        rows,
        [
            ("Masala Chai", "₹240.00"),
            ("Teapot", "₹12.50"),
            ("Unknown", "₹0.00")
        ]
    );

    let totals = shop.totals();
    assert_eq!(totals.subtotal, "₹252.50");
    assert_eq!(totals.tax, "₹12.63");
    assert_eq!(totals.total, "₹265.13");
}

#[tokio::test]
async fn test_signed_in_add_goes_to_server() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = signed_in(&backend).await;

    let outcome = shop.on_add_to_cart(ProductId::new(2), 3).await.unwrap();
    assert_eq!(outcome, AddOutcome::Server);
    assert_eq!(backend.data().server_cart.get(&2), Some(&3));
    assert!(shop.storage().get("localbite_cart").unwrap().is_none());

    assert_eq!(shop.cart_count(), 3);
    assert_eq!(shop.page().cart_mode, CartMode::Server);
    assert_eq!(shop.cart_items().lines[0].line_total, "₹750.00");

    let adds: Vec<_> = backend
        .requests()
        .into_iter()
        .filter(|r| r.path == "/api/cart/add")
        .collect();
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0].method, "POST");
    assert_eq!(adds[0].bearer.as_deref(), Some(SHOPPER_TOKEN));
}

#[tokio::test]
async fn test_server_failure_falls_back_to_local_cart() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = signed_in(&backend).await;
    backend.data().fail_cart_add = true;

    let outcome = shop.on_add_to_cart(ProductId::new(4), 1).await.unwrap();
    assert_eq!(outcome, AddOutcome::LocalAfterServerFailure);

    // The line landed locally and the server cart is untouched.
    let local = LocalCart::load_or_empty(shop.storage()).unwrap();
    assert_eq!(local.quantity(ProductId::new(4)), Some(1));
    assert!(backend.data().server_cart.is_empty());

    // The server cart stays authoritative, so the badge does not count it.
    assert_eq!(shop.cart_count(), 0);
    assert_eq!(shop.cart_items().message.as_deref(), Some("Cart is empty."));
    assert_ne!(shop.notices()[0].text, "Added to cart!");
}

#[tokio::test]
async fn test_count_failure_keeps_prior_count() {
    let backend = MockBackend::start().await.unwrap();
    let mut shop = signed_in(&backend).await;
    shop.on_add_to_cart(ProductId::new(1), 2).await.unwrap();
    assert_eq!(shop.cart_count(), 2);
    let totals_before = shop.totals().clone();

    backend.data().fail_cart_get = true;
    shop.refresh().await;

    assert_eq!(shop.cart_count(), 2);
    assert_eq!(shop.totals(), &totals_before);
    assert_eq!(
        shop.cart_items().message.as_deref(),
        Some("Cart unavailable.")
    );
    assert!(shop.render_html().unwrap().contains("Cart unavailable."));
}

#[tokio::test]
async fn test_deleted_server_product_shows_placeholder() {
    let backend = MockBackend::start().await.unwrap();
    {
        let mut data = backend.data();
        data.server_cart.insert(2, 1);
        data.deleted_lines.push(4);
    }
    let shop = signed_in(&backend).await;

    assert_eq!(shop.cart_count(), 5);
    let lines = &shop.cart_items().lines;
    assert_eq!(lines[1].name, "--");
    assert_eq!(lines[1].line_total, "₹0.00");
    assert_eq!(shop.totals().subtotal, "₹250.00");
    assert_eq!(shop.totals().tax, "₹12.50");
    assert_eq!(shop.totals().total, "₹262.50");
}

#[tokio::test]
async fn test_expired_token_reads_as_unavailable() {
    let backend = MockBackend::start().await.unwrap();
    let mut storage = MemoryStorage::default();
    SessionCredential::new("expired")
        .unwrap()
        .store(&mut storage)
        .unwrap();
    let mut shop = Storefront::new(backend.config().unwrap(), storage);
    shop.on_load().await;

    assert_eq!(
        shop.cart_items().message.as_deref(),
        Some("Cart unavailable.")
    );
    assert_eq!(shop.cart_count(), 0);
}
