use std::path::Path;

use quotebook_core::services::QuoteService;

use crate::commands::common::read_piped_stdin;
use crate::error::CliError;

pub async fn run_import(service: &QuoteService, path: &Path) -> Result<(), CliError> {
    let text = if path == Path::new("-") {
        read_piped_stdin()?.unwrap_or_default()
    } else {
        std::fs::read_to_string(path)?
    };
    if text.trim().is_empty() {
        return Err(CliError::EmptyImport(path.display().to_string()));
    }

    let imported = service.import_batch(&text).await?;
    println!("Quotes imported successfully! ({imported})");
    Ok(())
}
