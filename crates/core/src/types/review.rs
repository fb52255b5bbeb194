//! Product reviews.
//!
//! The reviews proxy forwards whatever the upstream review service returns,
//! so records are loosely typed: the title and body live under one of several
//! field names. [`Review::normalize`] is the single place that knows them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names that may carry a review's title, in priority order.
const TITLE_FIELDS: &[&str] = &["title", "heading", "displayTitle"];

/// Field names that may carry a review's body, in priority order.
const BODY_FIELDS: &[&str] = &["content", "reviewText", "review"];

/// Title used when a record carries none.
pub const DEFAULT_REVIEW_TITLE: &str = "Review";

/// A review record exactly as the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReview(pub Map<String, Value>);

impl RawReview {
    /// First non-empty string value among `fields`.
    fn first_text(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .filter_map(|field| self.0.get(*field).and_then(Value::as_str))
            .find(|text| !text.is_empty())
    }
}

/// The `reviews` member of a reviews response.
///
/// Either a bare list or an object wrapping the list under `reviews`. Any
/// other shape is kept as-is so the caller can decide how to degrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewsField {
    List(Vec<RawReview>),
    Nested { reviews: Vec<RawReview> },
    Other(Value),
}

impl ReviewsField {
    /// The raw records, or `None` when the shape is not recognized.
    #[must_use]
    pub fn records(&self) -> Option<&[RawReview]> {
        match self {
            Self::List(reviews) | Self::Nested { reviews } => Some(reviews),
            Self::Other(_) => None,
        }
    }
}

/// A normalized review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub title: String,
    pub body: String,
}

impl Review {
    /// Normalize a raw record, falling back to a placeholder title and an
    /// empty body for missing fields.
    #[must_use]
    pub fn normalize(raw: &RawReview) -> Self {
        Self {
            title: raw
                .first_text(TITLE_FIELDS)
                .unwrap_or(DEFAULT_REVIEW_TITLE)
                .to_string(),
            body: raw.first_text(BODY_FIELDS).unwrap_or_default().to_string(),
        }
    }
}
