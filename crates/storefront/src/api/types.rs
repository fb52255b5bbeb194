//! Request and response bodies exchanged with the backend.
//!
//! Response types are lenient: every member the backend may omit has a
//! default, because the backend mixes `{ok, error}` envelopes with bare
//! payloads.

use serde::{Deserialize, Serialize};

use myshop_core::{
    CartId, CartItemId, OrderId, Product, ProductId, ReviewsField, null_as_default,
};

/// Generic `{ok, error}` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/cart`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCart {
    #[serde(default)]
    pub cart_id: Option<CartId>,
    #[serde(default)]
    pub items: Vec<ServerCartItem>,
}

/// One line of the server cart. The product is `null` when it has been
/// deleted since it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCartItem {
    #[serde(default)]
    pub id: Option<CartItemId>,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
}

/// `POST /api/cart/add` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// `POST /api/checkout` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub payment_method: String,
}

/// `POST /api/checkout` response, read whatever the HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub invoice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/login` body.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `POST /api/login` response.
#[derive(Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("ok", &self.ok)
            .field("admin", &self.admin)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("error", &self.error)
            .finish()
    }
}

/// `GET /api/reviews` response, read whatever the HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub from_cache: Option<bool>,
    #[serde(default)]
    pub reviews: Option<ReviewsField>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/test` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub products: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_cart_with_deleted_product() {
        let cart: ServerCart = serde_json::from_str(
            r#"{"cart_id": 3, "items": [
                {"id": 1, "product": {"id": 5, "name": "Tea", "price": 10.0}, "quantity": 2},
                {"id": 2, "product": null, "quantity": 1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(cart.items.len(), 2);
        assert!(cart.items[1].product.is_none());
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_null_quantity_and_price_read_as_zero() {
        let cart: ServerCart = serde_json::from_str(
            r#"{"cart_id": 3, "items": [
                {"id": 1, "product": {"id": 5, "name": "Tea", "price": null}, "quantity": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(cart.items[0].quantity, 0);
        assert_eq!(cart.items[0].product.as_ref().unwrap().price, myshop_core::Price::ZERO);
    }

    #[test]
    fn test_empty_cart_body() {
        let cart: ServerCart = serde_json::from_str(r#"{"cart_id": null, "items": []}"#).unwrap();
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_checkout_failure_body() {
        let resp: CheckoutResponse = serde_json::from_str(r#"{"error": "cart empty"}"#).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error.as_deref(), Some("cart empty"));
    }

    #[test]
    fn test_login_response_debug_redacts_token() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"ok": true, "admin": false, "access_token": "eyJsecret"}"#)
                .unwrap();
        let debug = format!("{resp:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("eyJsecret"));
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest {
            email: "a@b.c",
            password: "hunter2",
        };
        assert!(!format!("{req:?}").contains("hunter2"));
    }
}
