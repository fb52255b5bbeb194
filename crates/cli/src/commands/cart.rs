//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! myshop add 7 --quantity 2
//! myshop cart
//! myshop checkout --payment-method cod
//! ```

use myshop_core::ProductId;

use super::{CommandError, PageHost, load_config, print_line};
use crate::GlobalArgs;

/// Add a product to the authoritative cart.
///
/// # Errors
///
/// Returns an error for a zero quantity or when the cart cannot be saved.
pub async fn add(global: &GlobalArgs, id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let result = host.shop().on_add_to_cart(id, quantity).await;
    host.finish(result.map(|_| ()))
}

/// Open the cart sidebar and print its lines and totals.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the page cannot be
/// written.
pub async fn show(global: &GlobalArgs) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let shop = host.shop();
    shop.on_toggle_cart(Some(true));

    let page = shop.page();
    print_line(&format!("{} cart, {} items", page.cart_mode, page.cart_count));
    match &page.cart_items.message {
        Some(message) => print_line(message),
        None => {
            for line in &page.cart_items.lines {
                print_line(&format!("{} x{} - {}", line.name, line.quantity, line.line_total));
            }
        }
    }
    print_line(&format!("Subtotal: {}", page.totals.subtotal));
    print_line(&format!("Tax: {}", page.totals.tax));
    print_line(&format!("Total: {}", page.totals.total));
    host.finish(Ok(()))
}

/// Place an order for the server cart.
///
/// # Errors
///
/// Returns an error if storage cannot be read. Refusals and sign-in
/// requirements are printed as notices.
pub async fn checkout(
    global: &GlobalArgs,
    payment_method: Option<String>,
) -> Result<(), CommandError> {
    let mut config = load_config(global)?;
    if let Some(method) = payment_method {
        config.payment_method = method;
    }
    let mut host = PageHost::open(config, global).await?;
    let shop = host.shop();
    shop.on_toggle_cart(Some(true));
    let result = shop.on_checkout().await;
    host.finish(result)
}
