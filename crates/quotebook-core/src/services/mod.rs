//! Services shared by every client

mod quotes;

pub use quotes::QuoteService;
