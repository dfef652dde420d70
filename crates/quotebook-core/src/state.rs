//! Shared sync state type.

/// Sync state reported to whatever drives the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No run has happened yet
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
}
