//! Data models for Quotebook

mod category;
mod quote;

pub use category::{category_set, CategoryFilter};
pub use quote::{default_quotes, unix_millis_now, Quote, QuoteId};
