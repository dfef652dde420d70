use std::path::Path;

use quotebook_core::services::QuoteService;

use crate::commands::common::export_target;
use crate::error::CliError;

pub async fn run_export(service: &QuoteService, output_path: Option<&Path>) -> Result<(), CliError> {
    let blob = service.export_all().await?;

    if let Some(output) = output_path {
        let path = export_target(output, &blob.file_name);
        std::fs::write(&path, &blob.bytes)?;
        println!("{}", path.display());
    } else {
        println!("{}", blob.text()?);
    }

    Ok(())
}
