use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use quotebook_core::config::SyncSettings;
use quotebook_core::remote::HttpRemote;
use quotebook_core::services::QuoteService;
use quotebook_core::storage::SqliteStore;
use quotebook_core::{CategoryFilter, Quote};
use serde::Serialize;

use crate::config_file::CliConfig;
use crate::error::CliError;

/// Everything a command needs to open the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub db_path: PathBuf,
    pub settings: SyncSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteListItem {
    pub id: Option<i64>,
    pub text: String,
    pub category: String,
    pub updated_at: i64,
    pub updated_at_iso: String,
    pub relative_time: String,
}

/// Flag, then environment, then config file, then built-in default.
pub fn resolve_config(
    cli_db_path: Option<PathBuf>,
    cli_remote_url: Option<String>,
    env_db_path: Option<PathBuf>,
    env_remote_url: Option<String>,
    config: &CliConfig,
) -> Result<ResolvedConfig, CliError> {
    let db_path = match cli_db_path
        .or(env_db_path)
        .or_else(|| config.db_path.clone())
    {
        Some(path) => path,
        None => default_db_path()?,
    };

    let mut settings = match cli_remote_url
        .or(env_remote_url)
        .or_else(|| config.remote_url.clone())
    {
        Some(url) => SyncSettings::new(url)?,
        None => SyncSettings::default(),
    };
    if let Some(secs) = config.sync_interval_secs {
        settings = settings.with_sync_interval(Duration::from_secs(secs));
    }
    if let Some(secs) = config.request_timeout_secs {
        settings = settings.with_request_timeout(Duration::from_secs(secs));
    }

    Ok(ResolvedConfig { db_path, settings })
}

/// [`resolve_config`] fed from the process environment and the config file.
pub fn resolve_from_env(
    cli_db_path: Option<PathBuf>,
    cli_remote_url: Option<String>,
) -> Result<ResolvedConfig, CliError> {
    let config = CliConfig::load().map_err(CliError::Config)?;
    resolve_config(
        cli_db_path,
        cli_remote_url,
        std::env::var_os("QUOTEBOOK_DB_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from),
        std::env::var("QUOTEBOOK_REMOTE_URL")
            .ok()
            .and_then(|value| normalize_content(&value)),
        &config,
    )
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("quotebook").join("quotebook.db"))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI data directory".to_string()))
}

pub fn open_service(resolved: &ResolvedConfig) -> Result<QuoteService, CliError> {
    let kv = SqliteStore::open(&resolved.db_path)?;
    let remote = HttpRemote::from_settings(&resolved.settings)?;
    Ok(QuoteService::open(
        Arc::new(kv),
        Arc::new(remote),
        resolved.settings.clone(),
    )?)
}

/// An explicit selection wins; otherwise the persisted one is reused.
pub async fn resolve_selection(service: &QuoteService, category: Option<&str>) -> CategoryFilter {
    match category {
        Some(category) => CategoryFilter::from_selection(category),
        None => service.selected_category().await,
    }
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    quotes
        .iter()
        .map(|quote| {
            let id = quote
                .id
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            let preview = quote_preview(quote, 50);
            let relative_time = format_relative_time(quote.updated_at, now_ms);
            format!(
                "{id:<13}  {preview:<50}  [{}]  {relative_time}",
                quote.category
            )
        })
        .collect()
}

pub fn quote_to_list_item(quote: &Quote) -> QuoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    QuoteListItem {
        id: quote.id.map(quotebook_core::QuoteId::value),
        text: quote.text.clone(),
        category: quote.category.clone(),
        updated_at: quote.updated_at,
        updated_at_iso: format_timestamp(quote.updated_at),
        relative_time: format_relative_time(quote.updated_at, now_ms),
    }
}

pub fn quote_preview(quote: &Quote, max_chars: usize) -> String {
    let collapsed = quote.text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    if timestamp_ms <= 0 {
        return "never".to_string();
    }

    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < month {
        format!("{}d ago", diff / day)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn resolve_quote_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_content(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Where `export -o` should write: a directory gets the blob's file name.
pub fn export_target(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}
