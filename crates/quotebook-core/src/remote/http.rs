//! HTTP client for a posts-style remote collection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{RemoteCollection, RemotePost, UNKNOWN_UPDATED_AT};
use crate::config::{normalize_remote_url, SyncSettings};
use crate::error::{Error, Result};
use crate::Quote;

/// `GET`/`POST` client for a JSON collection endpoint
#[derive(Clone)]
pub struct HttpRemote {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client for `endpoint`; every request is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = normalize_remote_url(endpoint.into())?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::Config(format!("failed to build HTTP client: {error}")))?;
        Ok(Self { endpoint, client })
    }

    pub fn from_settings(settings: &SyncSettings) -> Result<Self> {
        Self::new(settings.remote_url.clone(), settings.request_timeout)
    }
}

#[async_trait]
impl RemoteCollection for HttpRemote {
    async fn list(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let posts = response.json::<Vec<RemotePost>>().await?;
        let total = posts.len();
        let quotes = posts
            .into_iter()
            .filter_map(|post| post.into_quote(UNKNOWN_UPDATED_AT))
            .collect::<Vec<_>>();

        if quotes.len() < total {
            tracing::debug!(
                "Ignored {} remote records without text",
                total - quotes.len()
            );
        }
        Ok(quotes)
    }

    async fn create(&self, quote: &Quote) -> Result<Quote> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&RemotePost::from(quote))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let echoed = response.json::<RemotePost>().await?;
        echoed
            .into_quote(quote.updated_at)
            .ok_or_else(|| Error::Network("remote echoed a record without text".to_string()))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Network(parse_api_error(status, &body)))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Trimmed response body, at most 180 characters.
fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} (HTTP {})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} (HTTP {})", trimmed, status.as_u16())
    }
}
