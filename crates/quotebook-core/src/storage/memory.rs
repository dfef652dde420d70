//! In-memory `KeyValueStore`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Volatile store for tests and ephemeral sessions.
///
/// [`MemoryStore::set_unavailable`] makes every call fail with
/// [`Error::Persistence`], standing in for a store that went away.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn values(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Persistence("store unavailable".to_string()));
        }
        self.values
            .lock()
            .map_err(|_| Error::Persistence("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("quotes").unwrap(), None);
        store.set("quotes", "[]").unwrap();
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_unavailable_store_fails_both_ways() {
        let store = MemoryStore::with_entries([("quotes", "[]")]);
        store.set_unavailable(true);
        assert!(store.get("quotes").unwrap_err().is_persistence());
        assert!(store.set("quotes", "[]").unwrap_err().is_persistence());

        store.set_unavailable(false);
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
    }
}
