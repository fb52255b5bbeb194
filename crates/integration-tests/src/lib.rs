//! Integration test support for the MyShop storefront.
//!
//! [`MockBackend`] serves the backend JSON API from an in-process `axum`
//! router on an ephemeral port. Tests seed it, point a
//! [`Storefront`](myshop_storefront::Storefront) at it, and inspect both the
//! rendered state and the requests the backend saw.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p myshop-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await?;
//! let mut shop = Storefront::new(backend.config()?, MemoryStorage::default());
//! shop.on_load().await;
//! assert_eq!(backend.requests_to("/api/products"), 1);
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use myshop_storefront::{ConfigError, StorefrontConfig};

/// Email of the seeded shopper account.
pub const SHOPPER_EMAIL: &str = "shopper@example.com";
/// Password of the seeded shopper account.
pub const SHOPPER_PASSWORD: &str = "hunter2";
/// Token issued to the seeded shopper.
pub const SHOPPER_TOKEN: &str = "token-shopper";

/// How the mock answers `POST /api/checkout`.
#[derive(Debug, Clone)]
pub enum CheckoutBehavior {
    /// `{ok: true, order_id, invoice}` and the server cart is emptied.
    Place { invoice: String },
    /// HTTP 400 with `{ok: false, error}`.
    Refuse { error: Option<String> },
    /// HTTP 502 with a non-JSON body.
    Garbage,
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
}

/// Mutable backend data and failure switches.
#[derive(Debug)]
pub struct MockData {
    pub products: Vec<Value>,
    pub categories: Vec<Value>,
    /// Reviews endpoint answers by asin: status and body.
    pub reviews: BTreeMap<String, (StatusCode, Value)>,
    /// Server cart: product id to quantity, plus dangling lines whose
    /// product was deleted.
    pub server_cart: BTreeMap<i32, u32>,
    pub deleted_lines: Vec<u32>,
    pub checkout: CheckoutBehavior,
    pub last_payment_method: Option<String>,
    pub fail_products: bool,
    pub fail_categories: bool,
    pub fail_cart_get: bool,
    pub fail_cart_add: bool,
    /// Product detail answers with a non-JSON 200 body.
    pub garbage_product_detail: bool,
    pub requests: Vec<RecordedRequest>,
}

impl Default for MockData {
    fn default() -> Self {
        Self {
            products: seed_products(),
            categories: vec![
                json!({"id": 1, "name": "Tea"}),
                json!({"id": 2, "name": "Coffee"}),
            ],
            reviews: seed_reviews(),
            server_cart: BTreeMap::new(),
            deleted_lines: Vec::new(),
            checkout: CheckoutBehavior::Place {
                invoice: "INV-1001".to_string(),
            },
            last_payment_method: None,
            fail_products: false,
            fail_categories: false,
            fail_cart_get: false,
            fail_cart_add: false,
            garbage_product_detail: false,
            requests: Vec::new(),
        }
    }
}

/// Seed catalog.
///
/// 1. Masala Chai, discounted, reviews as a list
/// 2. Filter Coffee, reviews nested under `reviews`
/// 3. Teapot, uncategorized, no asin
/// 4. Green Tea, empty reviews
/// 5. Oolong, reviews declined by the backend
fn seed_products() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Masala Chai", "description": "Spiced black tea with cardamom", "price": 120, "discount_price": 99, "category_id": 1, "rating": 4.6, "asin": "B0CHAI", "stock": 40}),
        json!({"id": 2, "name": "Filter Coffee", "description": "South Indian roast", "price": 250, "discount_price": null, "category_id": 2, "rating": 4.2, "asin": "B0COFFEE", "image_url": "coffee.avif"}),
        json!({"id": 3, "name": "Teapot", "description": null, "price": "12.5", "category_id": null, "asin": ""}),
        json!({"id": 4, "name": "Green Tea", "description": "Loose leaf", "price": 300, "category_id": 1, "asin": "B0GREEN"}),
        json!({"id": 5, "name": "Oolong", "description": "Semi-oxidised", "price": 410, "category_id": 1, "asin": "B0OOLONG"}),
    ]
}

fn seed_reviews() -> BTreeMap<String, (StatusCode, Value)> {
    BTreeMap::from([
        (
            "B0CHAI".to_string(),
            (
                StatusCode::OK,
                json!({"ok": true, "from_cache": false, "reviews": [
                    {"title": "Lovely", "content": "Warming and fragrant"},
                    {"heading": "Strong", "reviewText": "Needs milk"}
                ]}),
            ),
        ),
        (
            "B0COFFEE".to_string(),
            (
                StatusCode::OK,
                json!({"ok": true, "from_cache": true, "reviews": {"reviews": [
                    {"displayTitle": "Perfect decoction", "review": "Just like home"}
                ]}}),
            ),
        ),
        (
            "B0GREEN".to_string(),
            (StatusCode::OK, json!({"ok": true, "reviews": []})),
        ),
        (
            "B0OOLONG".to_string(),
            (
                StatusCode::BAD_GATEWAY,
                json!({"ok": false, "error": "Review service quota exceeded"}),
            ),
        ),
    ])
}

/// Shared handle on the mock's data.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<MockData>>,
}

impl MockState {
    /// Lock the data for inspection or changes.
    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A running mock backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
}

impl MockBackend {
    /// Bind an ephemeral port and start serving the seeded data.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = MockState::default();
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });
        Ok(Self { addr, state })
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Storefront configuration pointed at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is rejected.
    pub fn config(&self) -> Result<StorefrontConfig, ConfigError> {
        let base = self.base_url();
        StorefrontConfig::from_lookup(|key| (key == "MYSHOP_API_BASE_URL").then(|| base.clone()))
    }

    pub fn data(&self) -> MutexGuard<'_, MockData> {
        self.state.data()
    }

    /// Number of requests seen for `path` (any method).
    #[must_use]
    pub fn requests_to(&self, path: &str) -> usize {
        self.data().requests.iter().filter(|r| r.path == path).count()
    }

    /// Every request seen so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.data().requests.clone()
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/products", get(products))
        .route("/api/products/{id}", get(product))
        .route("/api/categories", get(categories))
        .route("/api/cart", get(cart))
        .route("/api/cart/add", post(cart_add))
        .route("/api/checkout", post(checkout))
        .route("/api/login", post(login))
        .route("/api/reviews", get(reviews))
        .route("/api/test", get(health))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        bearer: bearer(request.headers()),
    };
    state.data().requests.push(recorded);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"msg": "Missing Authorization Header"})),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    bearer(headers).as_deref() == Some(SHOPPER_TOKEN)
}

async fn products(State(state): State<MockState>) -> Response {
    let data = state.data();
    if data.fail_products {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(Value::Array(data.products.clone())).into_response()
}

async fn product(State(state): State<MockState>, Path(id): Path<i32>) -> Response {
    let data = state.data();
    if data.garbage_product_detail {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    data.products
        .iter()
        .find(|p| p["id"] == json!(id))
        .map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
            |p| Json(p.clone()).into_response(),
        )
}

async fn categories(State(state): State<MockState>) -> Response {
    let data = state.data();
    if data.fail_categories {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(Value::Array(data.categories.clone())).into_response()
}

fn cart_body(data: &MockData) -> Value {
    let mut items: Vec<Value> = data
        .server_cart
        .iter()
        .enumerate()
        .map(|(i, (product_id, quantity))| {
            let product = data
                .products
                .iter()
                .find(|p| p["id"] == json!(product_id))
                .cloned()
                .unwrap_or(Value::Null);
            json!({"id": i + 1, "product": product, "quantity": quantity})
        })
        .collect();
    for quantity in &data.deleted_lines {
        items.push(json!({"id": items.len() + 1, "product": null, "quantity": quantity}));
    }
    json!({"cart_id": 1, "items": items})
}

async fn cart(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let data = state.data();
    if data.fail_cart_get {
        return (StatusCode::INTERNAL_SERVER_ERROR, "cart service down").into_response();
    }
    Json(cart_body(&data)).into_response()
}

#[derive(Deserialize)]
struct AddBody {
    product_id: i32,
    quantity: u32,
}

async fn cart_add(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<AddBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = state.data();
    if data.fail_cart_add {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "cart service down"})),
        )
            .into_response();
    }
    *data.server_cart.entry(body.product_id).or_insert(0) += body.quantity;
    Json(json!({"ok": true})).into_response()
}

#[derive(Deserialize)]
struct CheckoutBody {
    payment_method: String,
}

async fn checkout(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<CheckoutBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut data = state.data();
    data.last_payment_method = Some(body.payment_method);
    match data.checkout.clone() {
        CheckoutBehavior::Place { invoice } => {
            data.server_cart.clear();
            data.deleted_lines.clear();
            Json(json!({"ok": true, "order_id": 42, "invoice": invoice})).into_response()
        }
        CheckoutBehavior::Refuse { error } => {
            let body = error.map_or_else(|| json!({"ok": false}), |e| json!({"ok": false, "error": e}));
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        }
        CheckoutBehavior::Garbage => (StatusCode::BAD_GATEWAY, "upstream timeout").into_response(),
    }
}

#[derive(Deserialize)]
struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    match (body.email.as_deref(), body.password.as_deref()) {
        (Some(SHOPPER_EMAIL), Some(SHOPPER_PASSWORD)) => Json(json!({
            "ok": true,
            "admin": false,
            "access_token": SHOPPER_TOKEN,
        }))
        .into_response(),
        (Some(_), Some(_)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid credentials"})),
        )
            .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing credentials"})),
        )
            .into_response(),
    }
}

async fn reviews(
    State(state): State<MockState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let data = state.data();
    let asin = params.get("asin").cloned().unwrap_or_default();
    data.reviews.get(&asin).map_or_else(
        || {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"ok": false, "error": "No reviews found"})),
            )
                .into_response()
        },
        |(status, body)| (*status, Json(body.clone())).into_response(),
    )
}

async fn health(State(state): State<MockState>) -> Response {
    let count = state.data().products.len();
    Json(json!({"ok": true, "message": "API is working", "products": count})).into_response()
}
