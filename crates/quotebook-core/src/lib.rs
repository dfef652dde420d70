//! quotebook-core - Core library for Quotebook
//!
//! This crate contains the quote model, key-value persistence, the quote
//! store, JSON export/import and the remote synchronization logic used by the
//! Quotebook command-line client.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use models::{CategoryFilter, Quote, QuoteId};
pub use store::QuoteStore;
