//! Key-value persistence for the quote library

mod memory;
mod migrations;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// Key holding the JSON array of quotes.
pub const QUOTES_KEY: &str = "quotes";
/// Key holding the selected category as a plain string.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Opaque persistent string-to-string store
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (or overwrite) a value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
