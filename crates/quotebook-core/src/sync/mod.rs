//! Remote snapshot merge, sync reporting and single-flight guarding.

pub mod scheduler;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::{Quote, QuoteId};

pub use scheduler::SyncScheduler;

/// Counts produced by [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote records appended because no local record had their id
    pub added: usize,
    /// Local records overwritten by a strictly newer remote record
    pub updated: usize,
    /// Remote records whose local counterpart was equal or newer
    pub unchanged: usize,
    /// Remote records without an id
    pub skipped: usize,
}

impl MergeReport {
    /// Whether the merge changed the local sequence
    pub const fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Reconcile a remote snapshot into the local sequence (last write wins).
///
/// A remote record replaces its local counterpart only when its `updated_at`
/// is strictly greater; equal timestamps keep the local record. Unknown ids
/// are appended in snapshot order.
pub fn merge(local: &mut Vec<Quote>, remote: Vec<Quote>) -> MergeReport {
    let mut report = MergeReport::default();
    let mut index: HashMap<QuoteId, usize> = HashMap::with_capacity(local.len());
    for (position, quote) in local.iter().enumerate() {
        if let Some(id) = quote.id {
            index.entry(id).or_insert(position);
        }
    }

    for incoming in remote {
        let Some(id) = incoming.id else {
            report.skipped += 1;
            continue;
        };

        match index.get(&id) {
            None => {
                index.insert(id, local.len());
                local.push(incoming);
                report.added += 1;
            }
            Some(&position) if incoming.updated_at > local[position].updated_at => {
                tracing::debug!(
                    "Remote quote {} is newer ({} > {}), replacing local copy",
                    id,
                    incoming.updated_at,
                    local[position].updated_at
                );
                local[position] = incoming;
                report.updated += 1;
            }
            Some(_) => report.unchanged += 1,
        }
    }

    report
}

/// Result of a completed synchronization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub merge: MergeReport,
    /// Id echoed by the remote for the pushed record
    pub pushed: Option<QuoteId>,
    pub push_error: Option<String>,
    /// Set when the merged sequence could not be written to the store
    pub persist_error: Option<String>,
    pub categories: BTreeSet<String>,
}

/// What a call to `synchronize` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// The fetch failed; the local sequence was left unchanged
    Failed(String),
    /// Another run was still in flight
    Skipped,
}

impl SyncOutcome {
    /// One-line status message for the user
    pub fn status_message(&self) -> String {
        match self {
            Self::Completed(report) => {
                let mut message = format!(
                    "Synced: {} added, {} updated, {} unchanged",
                    report.merge.added, report.merge.updated, report.merge.unchanged
                );
                if let Some(id) = report.pushed {
                    let _ = write!(message, "; pushed quote {id}");
                }
                if let Some(error) = &report.push_error {
                    let _ = write!(message, "; push failed: {error}");
                }
                if let Some(error) = &report.persist_error {
                    let _ = write!(message, "; not saved: {error}");
                }
                message
            }
            Self::Failed(error) => format!("Sync failed: {error}"),
            Self::Skipped => "Sync skipped: previous run still in progress".to_string(),
        }
    }

    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Pick the record to push after a merge: the most recently appended local
/// record whose id the remote snapshot did not contain.
pub fn push_candidate(local: &[Quote], remote_ids: &BTreeSet<QuoteId>) -> Option<Quote> {
    local
        .iter()
        .rev()
        .find(|quote| quote.id.map_or(true, |id| !remote_ids.contains(&id)))
        .cloned()
}

/// Guard that marks a sync run as in flight until dropped.
pub struct SingleFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SingleFlight<'a> {
    /// Claim the flag, or `None` when another run holds it
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SingleFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
