//! JSON export and import of the quote library.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::Quote;

/// File name offered for every export.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Export payload handed to whatever delivers the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportBlob {
    /// The blob contents as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes)
            .map_err(|error| Error::Validation(format!("export is not UTF-8: {error}")))
    }
}

/// Render quotes as pretty-printed JSON (2-space indentation).
pub fn render_json_export(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Build the downloadable export blob.
pub fn export_blob(quotes: &[Quote]) -> Result<ExportBlob> {
    Ok(ExportBlob {
        file_name: EXPORT_FILE_NAME.to_string(),
        bytes: render_json_export(quotes)?.into_bytes(),
    })
}

/// Parse an import payload into quote records.
///
/// The payload must be a JSON array; its elements are taken as-is, without
/// de-duplication or content checks.
pub fn parse_import(text: &str) -> Result<Vec<Quote>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|error| Error::ImportParse(format!("invalid JSON: {error}")))?;

    if !value.is_array() {
        return Err(Error::ImportParse(
            "expected a JSON array of quotes".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|error| Error::ImportParse(format!("invalid quote record: {error}")))
}
