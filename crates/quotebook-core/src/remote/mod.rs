//! Remote quote collection: the trait, the wire shape and its mapping.

mod http;
mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Quote, QuoteId};

/// Categories handed out to remote records that carry none.
pub const CATEGORY_CYCLE: [&str; 3] = ["Motivation", "Inspiration", "Resilience"];

/// `updatedAt` given to remote records that carry none, older than any
/// local edit.
pub const UNKNOWN_UPDATED_AT: i64 = 0;

/// A remote collection of quote records
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Fetch a snapshot of every remote record
    async fn list(&self) -> Result<Vec<Quote>>;

    /// Create a record remotely, returning the echoed record
    async fn create(&self, quote: &Quote) -> Result<Quote>;
}

/// Record shape spoken by the remote endpoint.
///
/// Posts-style endpoints send `title`/`body`; quote-aware ones may send
/// `text`, `category` and `updatedAt` directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl RemotePost {
    /// Map to a local quote. `default_updated_at` stands in for a missing
    /// `updatedAt`. Records with neither `text` nor `title` yield `None`.
    pub fn into_quote(self, default_updated_at: i64) -> Option<Quote> {
        let text = self
            .text
            .or(self.title)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())?;

        let category = self
            .category
            .map(|category| category.trim().to_string())
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| cycled_category(self.id).to_string());

        Some(Quote {
            id: self.id.map(QuoteId::new),
            text,
            category,
            updated_at: self.updated_at.unwrap_or(default_updated_at),
        })
    }
}

impl From<&Quote> for RemotePost {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id.map(QuoteId::value),
            title: Some(quote.text.clone()),
            body: Some(quote.text.clone()),
            text: Some(quote.text.clone()),
            category: Some(quote.category.clone()),
            updated_at: Some(quote.updated_at),
            user_id: Some(1),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn cycled_category(id: Option<i64>) -> &'static str {
    let slot = id.map_or(0, |id| id.rem_euclid(CATEGORY_CYCLE.len() as i64));
    CATEGORY_CYCLE[slot as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn title_becomes_text_and_category_is_cycled() {
        let post = RemotePost {
            id: Some(4),
            title: Some("sunt aut facere".to_string()),
            body: Some("quia et suscipit".to_string()),
            user_id: Some(1),
            ..RemotePost::default()
        };
        let quote = post.into_quote(1_000).unwrap();
        assert_eq!(quote, Quote::with_id(4, "sunt aut facere", "Inspiration", 1_000));
    }

    #[test]
    fn explicit_fields_win_over_fallbacks() {
        let post = RemotePost {
            id: Some(2),
            title: Some("title".to_string()),
            text: Some("text".to_string()),
            category: Some("Custom".to_string()),
            updated_at: Some(42),
            ..RemotePost::default()
        };
        assert_eq!(
            post.into_quote(1_000).unwrap(),
            Quote::with_id(2, "text", "Custom", 42)
        );
    }

    #[test]
    fn records_without_text_are_dropped() {
        let post = RemotePost {
            id: Some(1),
            title: Some("   ".to_string()),
            ..RemotePost::default()
        };
        assert_eq!(post.into_quote(1), None);
    }

    #[test]
    fn category_cycle_wraps() {
        assert_eq!(cycled_category(Some(0)), "Motivation");
        assert_eq!(cycled_category(Some(3)), "Motivation");
        assert_eq!(cycled_category(Some(5)), "Resilience");
        assert_eq!(cycled_category(None), "Motivation");
    }

    #[test]
    fn outgoing_post_carries_text_as_title() {
        let quote = Quote::with_id(7, "Keep going.", "Resilience", 99);
        let json = serde_json::to_value(RemotePost::from(&quote)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Keep going.",
                "body": "Keep going.",
                "text": "Keep going.",
                "category": "Resilience",
                "updatedAt": 99,
                "userId": 1
            })
        );
    }
}
