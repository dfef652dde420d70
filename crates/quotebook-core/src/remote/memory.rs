//! In-process mock remote collection

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::RemoteCollection;
use crate::error::{Error, Result};
use crate::models::QuoteId;
use crate::Quote;

/// Mock collection that keeps records in memory.
///
/// Created records are assigned the next server id (starting at 101 unless
/// seeded higher) and become part of later snapshots.
pub struct MemoryRemote {
    records: Mutex<Vec<Quote>>,
    created: Mutex<Vec<Quote>>,
    next_id: AtomicI64,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Quote>) -> Self {
        let highest = records
            .iter()
            .filter_map(|quote| quote.id.map(QuoteId::value))
            .max()
            .unwrap_or(0);
        Self {
            records: Mutex::new(records),
            created: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(highest.max(100) + 1),
            fail_list: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            latency: Mutex::new(None),
        }
    }

    /// Replace a record by id, or append it
    pub fn upsert(&self, quote: Quote) {
        let mut records = lock(&self.records);
        match records.iter_mut().find(|record| record.id == quote.id) {
            Some(existing) => *existing = quote,
            None => records.push(quote),
        }
    }

    pub fn records(&self) -> Vec<Quote> {
        lock(&self.records).clone()
    }

    /// Every record received through `create`, as sent
    pub fn created(&self) -> Vec<Quote> {
        lock(&self.created).clone()
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Delay every response by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        *lock(&self.latency) = latency;
    }

    async fn simulate_latency(&self) {
        let latency = *lock(&self.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RemoteCollection for MemoryRemote {
    async fn list(&self) -> Result<Vec<Quote>> {
        self.simulate_latency().await;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::Network("mock remote unavailable".to_string()));
        }
        Ok(self.records())
    }

    async fn create(&self, quote: &Quote) -> Result<Quote> {
        self.simulate_latency().await;
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::Network("mock remote rejected create".to_string()));
        }

        lock(&self.created).push(quote.clone());

        let mut echoed = quote.clone();
        if echoed.id.is_none() {
            echoed.id = Some(QuoteId::new(self.next_id.fetch_add(1, Ordering::SeqCst)));
        }
        self.upsert(echoed.clone());
        Ok(echoed)
    }
}

// Lock poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_ids_and_shows_up_in_list() {
        let remote = MemoryRemote::new();
        let anonymous = Quote {
            id: None,
            text: "X".to_string(),
            category: "Y".to_string(),
            updated_at: 1,
        };

        let echoed = remote.create(&anonymous).await.unwrap();
        assert_eq!(echoed.id, Some(QuoteId::new(101)));

        let kept = remote.create(&Quote::with_id(5, "Z", "Y", 2)).await.unwrap();
        assert_eq!(kept.id, Some(QuoteId::new(5)));

        assert_eq!(remote.list().await.unwrap().len(), 2);
        assert_eq!(remote.created().len(), 2);
    }

    #[tokio::test]
    async fn failure_injection() {
        let remote = MemoryRemote::with_records(vec![Quote::with_id(1, "a", "b", 1)]);
        remote.set_fail_list(true);
        remote.set_fail_create(true);

        assert!(matches!(remote.list().await, Err(Error::Network(_))));
        assert!(matches!(
            remote.create(&Quote::with_id(2, "c", "d", 1)).await,
            Err(Error::Network(_))
        ));
        assert!(remote.created().is_empty());
    }

    #[test]
    fn upsert_replaces_by_id() {
        let remote = MemoryRemote::with_records(vec![Quote::with_id(1, "old", "A", 1)]);
        remote.upsert(Quote::with_id(1, "new", "A", 2));
        assert_eq!(remote.records(), vec![Quote::with_id(1, "new", "A", 2)]);
    }
}
