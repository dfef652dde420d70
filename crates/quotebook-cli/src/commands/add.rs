use quotebook_core::services::QuoteService;

use crate::commands::common::resolve_quote_text;
use crate::error::CliError;

pub async fn run_add(
    service: &QuoteService,
    text_parts: &[String],
    category: &str,
    no_push: bool,
) -> Result<(), CliError> {
    let text = resolve_quote_text(text_parts)?;

    // The process exits right after, so the push is awaited rather than spawned.
    let quote = if no_push {
        service.add_local(&text, category).await?
    } else {
        service.add_and_push(&text, category).await?.0
    };

    if let Some(id) = quote.id {
        println!("{id}");
    }
    Ok(())
}
