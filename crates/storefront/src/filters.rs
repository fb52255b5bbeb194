//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a whole-number discount as a badge label.
///
/// Usage in templates: `{{ pct|percent_off }}` renders `20% OFF`.
#[askama::filter_fn]
pub fn percent_off(pct: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{pct}% OFF"))
}

/// Pluralizes `item` by count.
///
/// Usage in templates: `{{ count|items }}` renders `1 item` or `3 items`.
#[askama::filter_fn]
pub fn items(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    if count == "1" {
        Ok("1 item".to_string())
    } else {
        Ok(format!("{count} items"))
    }
}
