use quotebook_core::services::QuoteService;

use crate::commands::common::{
    format_quote_lines, quote_to_list_item, resolve_selection, QuoteListItem,
};
use crate::error::CliError;

pub async fn run_list(
    service: &QuoteService,
    category: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let selection = resolve_selection(service, category).await;
    let quotes = service.filter(selection).await?;

    if as_json {
        let json_items = quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_quote_lines(&quotes) {
            println!("{line}");
        }
    }

    Ok(())
}
