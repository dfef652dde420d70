pub mod add;
pub mod categories;
pub mod common;
pub mod config;
pub mod export;
pub mod import;
pub mod list;
pub mod random;
pub mod show;
pub mod sync;
