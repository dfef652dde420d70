//! Thread-safe quote service: the store, the remote and the sync loop.

use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::config::SyncSettings;
use crate::export::ExportBlob;
use crate::models::{CategoryFilter, Quote, QuoteId};
use crate::remote::RemoteCollection;
use crate::state::SyncState;
use crate::storage::KeyValueStore;
use crate::sync::{SingleFlight, SyncOutcome, SyncReport, SyncScheduler};
use crate::{Error, QuoteStore, Result};

/// Cloneable handle around a [`QuoteStore`].
///
/// All mutations go through one async mutex, which is never held across a
/// network call.
#[derive(Clone)]
pub struct QuoteService {
    store: Arc<Mutex<QuoteStore>>,
    remote: Arc<dyn RemoteCollection>,
    settings: SyncSettings,
    in_flight: Arc<AtomicBool>,
    state: Arc<watch::Sender<SyncState>>,
}

impl QuoteService {
    pub fn new(store: QuoteStore, remote: Arc<dyn RemoteCollection>, settings: SyncSettings) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            store: Arc::new(Mutex::new(store)),
            remote,
            settings,
            in_flight: Arc::new(AtomicBool::new(false)),
            state: Arc::new(state),
        }
    }

    /// Load the store from `kv` and wrap it.
    pub fn open(
        kv: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteCollection>,
        settings: SyncSettings,
    ) -> Result<Self> {
        Ok(Self::new(QuoteStore::load(kv)?, remote, settings))
    }

    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn sync_state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// Add a quote and push it to the remote in the background.
    ///
    /// Returns as soon as the quote is stored locally; push failures are only
    /// logged.
    pub async fn add(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = self.add_local(text, category).await?;

        let service = self.clone();
        let pushed = quote.clone();
        tokio::spawn(async move {
            match service.push(&pushed).await {
                Ok(echoed) => tracing::debug!("Pushed new quote, remote id {:?}", echoed.id),
                Err(error) => tracing::warn!("Background push failed: {}", error),
            }
        });

        Ok(quote)
    }

    /// Add a quote, then wait for the push.
    ///
    /// The outer error means nothing was stored; the inner result is the
    /// push outcome for the stored quote.
    pub async fn add_and_push(&self, text: &str, category: &str) -> Result<(Quote, Result<Quote>)> {
        let quote = self.add_local(text, category).await?;
        let pushed = self.push(&quote).await;
        if let Err(error) = &pushed {
            tracing::warn!("Quote saved locally but not pushed: {}", error);
        }
        Ok((quote, pushed))
    }

    /// Add a quote without contacting the remote.
    pub async fn add_local(&self, text: &str, category: &str) -> Result<Quote> {
        self.store.lock().await.add(text, category)
    }

    /// Send one record to the remote, bounded by the request timeout.
    ///
    /// A record pushed without an id takes the id the remote echoes back, so
    /// later snapshots recognise it.
    pub async fn push(&self, quote: &Quote) -> Result<Quote> {
        let timeout = self.settings.request_timeout;
        let echoed = tokio::time::timeout(timeout, self.remote.create(quote))
            .await
            .map_err(|_| Error::Network(format!("push timed out after {timeout:?}")))??;

        if let (None, Some(id)) = (quote.id, echoed.id) {
            if let Err(error) = self.store.lock().await.adopt_remote_id(quote, id) {
                tracing::warn!("Remote id {} for pushed quote was not saved: {}", id, error);
            }
        }
        Ok(echoed)
    }

    pub async fn quotes(&self) -> Vec<Quote> {
        self.store.lock().await.quotes().to_vec()
    }

    pub async fn get(&self, id: QuoteId) -> Option<Quote> {
        self.store.lock().await.get(id).cloned()
    }

    /// Select and persist a category, returning the matching quotes.
    pub async fn filter(&self, selection: CategoryFilter) -> Result<Vec<Quote>> {
        let mut store = self.store.lock().await;
        Ok(store.filter(selection)?.cloned().collect())
    }

    pub async fn selected_category(&self) -> CategoryFilter {
        self.store.lock().await.selected_category().clone()
    }

    pub async fn random_quote(&self, selection: &CategoryFilter) -> Option<Quote> {
        self.store.lock().await.random_quote(selection).cloned()
    }

    pub async fn categories(&self) -> BTreeSet<String> {
        self.store.lock().await.categories()
    }

    pub async fn export_all(&self) -> Result<ExportBlob> {
        self.store.lock().await.export_all()
    }

    pub async fn import_batch(&self, text: &str) -> Result<usize> {
        self.store.lock().await.import_batch(text)
    }

    /// Fetch the remote snapshot, merge it, persist, then push the newest
    /// local-only record.
    ///
    /// Returns [`SyncOutcome::Skipped`] without doing anything while another
    /// run is in flight. Fetch failures leave the local sequence unchanged.
    pub async fn synchronize(&self) -> SyncOutcome {
        let Some(_flight) = SingleFlight::try_acquire(&self.in_flight) else {
            tracing::debug!("Sync already in progress, skipping");
            return SyncOutcome::Skipped;
        };
        self.state.send_replace(SyncState::Syncing);

        let timeout = self.settings.request_timeout;
        let snapshot = match tokio::time::timeout(timeout, self.remote.list()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(error)) => return self.fail(error.to_string()),
            Err(_) => return self.fail(format!("fetch timed out after {timeout:?}")),
        };
        tracing::debug!("Fetched {} remote quotes", snapshot.len());

        let remote_ids: BTreeSet<QuoteId> = snapshot.iter().filter_map(|quote| quote.id).collect();
        let (merge, persist_error, categories, candidate) = {
            let mut store = self.store.lock().await;
            let merge = store.merge_remote(snapshot);
            let persist_error = store.persist_quotes().err().map(|error| error.to_string());
            (
                merge,
                persist_error,
                store.categories(),
                store.push_candidate(&remote_ids),
            )
        };

        let (pushed, push_error) = match candidate {
            None => (None, None),
            Some(quote) => match self.push(&quote).await {
                Ok(echoed) => (echoed.id.or(quote.id), None),
                Err(error) => {
                    tracing::warn!("Push after sync failed: {}", error);
                    (None, Some(error.to_string()))
                }
            },
        };

        let outcome = SyncOutcome::Completed(SyncReport {
            merge,
            pushed,
            push_error,
            persist_error,
            categories,
        });
        tracing::info!("{}", outcome.status_message());
        self.state.send_replace(SyncState::Synced);
        outcome
    }

    /// Run `synchronize` now and then every `sync_interval` after each run
    /// completes.
    pub fn spawn_scheduler<F>(&self, on_outcome: F) -> SyncScheduler
    where
        F: FnMut(&SyncOutcome) + Send + 'static,
    {
        let service = self.clone();
        SyncScheduler::spawn(
            self.settings.sync_interval,
            move || {
                let service = service.clone();
                async move { service.synchronize().await }
            },
            on_outcome,
        )
    }

    fn fail(&self, error: String) -> SyncOutcome {
        tracing::warn!("Sync failed: {}", error);
        self.state.send_replace(SyncState::Error);
        SyncOutcome::Failed(error)
    }
}
