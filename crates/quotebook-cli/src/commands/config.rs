use std::path::PathBuf;

use quotebook_core::config::normalize_remote_url;
use quotebook_core::config::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::ResolvedConfig;
use crate::config_file::CliConfig;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, resolved: &ResolvedConfig) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            remote_url,
            sync_interval,
            timeout,
            database,
        } => run_config_init(remote_url, sync_interval, timeout, database),
        ConfigCommands::Show => {
            for line in format_resolved_config(resolved) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

pub fn run_config_init(
    remote_url: Option<String>,
    sync_interval: Option<u64>,
    timeout: Option<u64>,
    database: Option<PathBuf>,
) -> Result<(), CliError> {
    let existing = CliConfig::load().map_err(CliError::Config)?;
    let config = apply_config_updates(existing, remote_url, sync_interval, timeout, database)?;
    let path = config.save().map_err(CliError::Config)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Merge explicit values over `existing`; omitted values keep their old setting.
pub fn apply_config_updates(
    mut config: CliConfig,
    remote_url: Option<String>,
    sync_interval: Option<u64>,
    timeout: Option<u64>,
    database: Option<PathBuf>,
) -> Result<CliConfig, CliError> {
    if let Some(url) = normalize_text_option(remote_url) {
        config.remote_url = Some(normalize_remote_url(url)?);
    }
    if let Some(secs) = sync_interval {
        if secs == 0 {
            return Err(CliError::Config(
                "sync interval must be at least 1 second".to_string(),
            ));
        }
        config.sync_interval_secs = Some(secs);
    }
    if let Some(secs) = timeout {
        if secs == 0 {
            return Err(CliError::Config(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        config.request_timeout_secs = Some(secs);
    }
    if let Some(path) = database {
        config.db_path = Some(path);
    }
    Ok(config)
}

pub fn format_resolved_config(resolved: &ResolvedConfig) -> Vec<String> {
    vec![
        format!("database:        {}", resolved.db_path.display()),
        format!("remote url:      {}", resolved.settings.remote_url),
        format!(
            "sync interval:   {}s",
            resolved.settings.sync_interval.as_secs()
        ),
        format!(
            "request timeout: {}s",
            resolved.settings.request_timeout.as_secs()
        ),
    ]
}
