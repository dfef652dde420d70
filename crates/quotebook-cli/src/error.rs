use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotebook_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No quote text provided")]
    EmptyContent,
    #[error("Import file is empty: {0}")]
    EmptyImport(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    SyncFailed(String),
}
