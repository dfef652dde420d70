use quotebook_core::services::QuoteService;

use crate::commands::common::resolve_selection;
use crate::error::CliError;

pub async fn run_random(service: &QuoteService, category: Option<&str>) -> Result<(), CliError> {
    let selection = resolve_selection(service, category).await;
    match service.random_quote(&selection).await {
        Some(quote) => println!("{}", quote.display_line()),
        None => println!("No quotes in {selection}."),
    }
    Ok(())
}
