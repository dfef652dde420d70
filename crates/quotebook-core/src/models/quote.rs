//! Quote model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a quote. Locally created quotes use their creation time in
/// Unix milliseconds; remote quotes keep the id the remote assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(i64);

impl QuoteId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw integer value of this ID
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for QuoteId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuoteId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A quote in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Identifier, absent for seeded or imported quotes that never had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
    /// Quote text
    #[serde(default)]
    pub text: String,
    /// Category name, compared by exact string equality
    #[serde(default)]
    pub category: String,
    /// Last modification timestamp (Unix ms), the only conflict signal
    #[serde(default)]
    pub updated_at: i64,
}

impl Quote {
    /// Create a new quote stamped with the current time as both id and
    /// `updated_at`.
    #[must_use]
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: Some(QuoteId(now)),
            text: text.into(),
            category: category.into(),
            updated_at: now,
        }
    }

    /// Create a quote with explicit id and timestamp.
    #[must_use]
    pub fn with_id(
        id: i64,
        text: impl Into<String>,
        category: impl Into<String>,
        updated_at: i64,
    ) -> Self {
        Self {
            id: Some(QuoteId(id)),
            text: text.into(),
            category: category.into(),
            updated_at,
        }
    }

    /// Render as `"text" — [category]`.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("\"{}\" — [{}]", self.text, self.category)
    }
}

/// Current Unix time in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The quotes a fresh library starts with.
#[must_use]
pub fn default_quotes() -> Vec<Quote> {
    [
        (
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        ("Don't let yesterday take up too much of today.", "Inspiration"),
        (
            "It's not whether you get knocked down, it's whether you get up.",
            "Resilience",
        ),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        id: None,
        text: text.to_string(),
        category: category.to_string(),
        updated_at: 0,
    })
    .collect()
}
