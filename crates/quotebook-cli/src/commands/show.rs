use quotebook_core::services::QuoteService;
use quotebook_core::QuoteId;

use crate::commands::common::format_timestamp;
use crate::error::CliError;

pub async fn run_show(service: &QuoteService, id: QuoteId) -> Result<(), CliError> {
    let quote = service
        .get(id)
        .await
        .ok_or_else(|| quotebook_core::Error::NotFound(id.to_string()))?;

    println!("{}", quote.display_line());
    println!("updated {}", format_timestamp(quote.updated_at));
    Ok(())
}
