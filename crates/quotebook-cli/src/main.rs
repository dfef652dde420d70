//! Quotebook CLI - keep a small library of quotes from the terminal
//!
//! Quotes live in a local sqlite file and can be synchronized with a remote
//! JSON collection.

mod cli;
mod commands;
mod config_file;
mod error;


use std::time::Duration;

use clap::{CommandFactory, Parser};
use quotebook_core::services::QuoteService;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::common::{open_service, resolve_from_env, ResolvedConfig};
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::random::run_random;
use crate::commands::show::run_show;
use crate::commands::sync::{run_sync, run_watch};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "quotebook=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut resolved = resolve_from_env(cli.db_path, cli.remote_url)?;
    if let Commands::Watch {
        interval: Some(secs),
    } = &command
    {
        if *secs == 0 {
            return Err(CliError::Config(
                "sync interval must be at least 1 second".to_string(),
            ));
        }
        resolved.settings = resolved
            .settings
            .with_sync_interval(Duration::from_secs(*secs));
    }

    match command {
        Commands::Config { command } => run_config(command, &resolved),
        command => {
            let service = open_service(&resolved)?;
            run_command(&service, &resolved, command).await
        }
    }
}

async fn run_command(
    service: &QuoteService,
    resolved: &ResolvedConfig,
    command: Commands,
) -> Result<(), CliError> {
    match command {
        Commands::Add {
            text,
            category,
            no_push,
        } => run_add(service, &text, &category, no_push).await,
        Commands::List { category, json } => run_list(service, category.as_deref(), json).await,
        Commands::Show { id } => run_show(service, id).await,
        Commands::Random { category } => run_random(service, category.as_deref()).await,
        Commands::Categories { json } => run_categories(service, json).await,
        Commands::Export { output } => run_export(service, output.as_deref()).await,
        Commands::Import { path } => run_import(service, &path).await,
        Commands::Sync => run_sync(service).await,
        Commands::Watch { .. } => run_watch(service).await,
        Commands::Config { command } => run_config(command, resolved),
    }
}
