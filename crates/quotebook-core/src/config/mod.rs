//! Synchronization settings shared by every client.

use std::time::Duration;

use crate::error::{Error, Result};

/// Remote collection used when nothing else is configured.
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";
/// Delay between the end of one periodic sync and the start of the next.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;
/// Upper bound for a single remote request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Configuration for remote synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Remote collection endpoint (e.g., `https://api.example.com/posts`)
    pub remote_url: String,
    /// Fixed delay between periodic runs
    pub sync_interval: Duration,
    /// Timeout applied to every fetch and push
    pub request_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl SyncSettings {
    /// Create settings for the given endpoint with default timings
    pub fn new(remote_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            remote_url: normalize_remote_url(remote_url.into())?,
            ..Self::default()
        })
    }

    /// Set the periodic sync interval
    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Trim optional text; blank values become `None`.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Validate a remote endpoint and strip trailing slashes.
pub fn normalize_remote_url(raw: String) -> Result<String> {
    let url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config("remote URL must not be empty".to_string()))?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(
            "remote URL must include http:// or https://".to_string(),
        ))
    }
}
