use quotebook_core::services::QuoteService;

use crate::error::CliError;

pub async fn run_categories(service: &QuoteService, as_json: bool) -> Result<(), CliError> {
    let categories = service.categories().await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        for category in categories {
            println!("{category}");
        }
    }
    Ok(())
}
