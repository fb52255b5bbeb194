//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! myshop browse --search tea --category 1
//! myshop product 7
//! ```

use myshop_core::{CategoryId, ProductId};

use super::{CommandError, PageHost, print_line};
use crate::GlobalArgs;

/// Render the catalog with the given filters and list the visible products.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the page cannot be
/// written. Catalog failures show on the page instead.
pub async fn browse(
    global: &GlobalArgs,
    search: &str,
    category: Option<CategoryId>,
) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let shop = host.shop();
    shop.on_search(search);
    if let Some(category) = category {
        shop.on_category_click(category);
    }

    let page = shop.page();
    if let Some(indicator) = &page.catalog_indicator {
        print_line(indicator);
    }
    for card in &page.products {
        let price = match (&card.original_price, card.discount_percent) {
            (Some(original), Some(pct)) => format!("{} (was {original}, {pct}% OFF)", card.price),
            _ => card.price.clone(),
        };
        print_line(&format!("#{} {} - {price} - {}", card.id, card.name, card.rating));
    }
    host.finish(Ok(()))
}

/// Open the product modal and print its reviews.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the page cannot be
/// written. A missing product is reported as a notice.
pub async fn product(global: &GlobalArgs, id: ProductId) -> Result<(), CommandError> {
    let mut host = PageHost::from_args(global).await?;
    let shop = host.shop();
    shop.on_open_product(id).await;

    if let Some(detail) = shop.page().detail {
        print_line(&format!("{} - {}", detail.title, detail.price));
        if !detail.description.is_empty() {
            print_line(&detail.description);
        }
        match &detail.reviews_message {
            Some(message) => print_line(message),
            None => {
                for review in &detail.reviews {
                    print_line(&format!("* {}: {}", review.title, review.body));
                }
            }
        }
    }
    host.finish(Ok(()))
}
