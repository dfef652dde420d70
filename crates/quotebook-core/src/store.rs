//! The quote library: an ordered sequence mirrored into a key-value store.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::seq::IteratorRandom;

use crate::error::{Error, Result};
use crate::export::{export_blob, parse_import, ExportBlob};
use crate::models::{
    category_set, default_quotes, unix_millis_now, CategoryFilter, Quote, QuoteId,
};
use crate::storage::{KeyValueStore, QUOTES_KEY, SELECTED_CATEGORY_KEY};
use crate::sync::{merge, push_candidate, MergeReport};

/// In-memory quote sequence plus the active category selection.
///
/// Every mutation writes the full sequence back to the key-value store. When
/// that write fails the in-memory state is kept and the operation returns
/// [`Error::Persistence`].
pub struct QuoteStore {
    kv: Arc<dyn KeyValueStore>,
    quotes: Vec<Quote>,
    selected: CategoryFilter,
}

impl QuoteStore {
    /// Restore quotes and the selected category from `kv`.
    ///
    /// A store that never saved quotes starts with the default seed.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Result<Self> {
        let quotes = match kv.get(QUOTES_KEY)? {
            None => default_quotes(),
            Some(raw) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => quotes,
                Err(error) => {
                    tracing::warn!(
                        "Stored quotes are unreadable ({}); starting from the default set",
                        error
                    );
                    default_quotes()
                }
            },
        };

        let selected = kv
            .get(SELECTED_CATEGORY_KEY)?
            .map(|raw| CategoryFilter::from_selection(&raw))
            .unwrap_or_default();

        tracing::debug!(
            "Loaded {} quotes (selected category: {})",
            quotes.len(),
            selected
        );
        Ok(Self {
            kv,
            quotes,
            selected,
        })
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.iter().find(|quote| quote.id == Some(id))
    }

    /// Append a new quote and persist the sequence.
    ///
    /// Both fields are trimmed; either being empty is rejected before
    /// anything changes.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(Error::Validation("quote text must not be empty".to_string()));
        }
        if category.is_empty() {
            return Err(Error::Validation("category must not be empty".to_string()));
        }

        let now = unix_millis_now();
        let quote = Quote {
            id: Some(self.next_id(now)),
            text: text.to_string(),
            category: category.to_string(),
            updated_at: now,
        };
        self.quotes.push(quote.clone());
        tracing::debug!("Added quote {:?} in {}", quote.id, quote.category);

        self.persist_quotes()?;
        Ok(quote)
    }

    /// Make `selection` the active category, persist it, and iterate the
    /// matching quotes.
    pub fn filter(&mut self, selection: CategoryFilter) -> Result<QuoteFilter<'_>> {
        self.selected = selection;
        self.kv
            .set(SELECTED_CATEGORY_KEY, &self.selected.to_string())
            .inspect_err(|error| {
                tracing::warn!("Failed to persist selected category: {}", error);
            })?;
        Ok(QuoteFilter::new(&self.quotes, &self.selected))
    }

    /// Iterate quotes matching `selection` without changing the active one.
    pub fn view<'a>(&'a self, selection: &'a CategoryFilter) -> QuoteFilter<'a> {
        QuoteFilter::new(&self.quotes, selection)
    }

    pub const fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Pick a uniformly random quote among those matching `selection`.
    pub fn random_quote<'a>(&'a self, selection: &'a CategoryFilter) -> Option<&'a Quote> {
        self.view(selection).choose(&mut rand::thread_rng())
    }

    /// Distinct categories currently present.
    pub fn categories(&self) -> BTreeSet<String> {
        category_set(&self.quotes)
    }

    pub fn export_all(&self) -> Result<ExportBlob> {
        export_blob(&self.quotes)
    }

    /// Append every record from a JSON export and persist.
    ///
    /// The payload is parsed before anything changes, so a malformed import
    /// leaves the sequence untouched. Records are not de-duplicated.
    pub fn import_batch(&mut self, text: &str) -> Result<usize> {
        let imported = parse_import(text)?;
        let count = imported.len();
        self.quotes.extend(imported);
        tracing::info!("Imported {} quotes", count);

        self.persist_quotes()?;
        Ok(count)
    }

    /// Merge a remote snapshot into the sequence without persisting.
    pub fn merge_remote(&mut self, snapshot: Vec<Quote>) -> MergeReport {
        merge(&mut self.quotes, snapshot)
    }

    /// Give a pushed record that had no id the id the remote assigned it.
    ///
    /// Returns `false` when no matching id-less record is left or the id is
    /// already taken locally.
    pub fn adopt_remote_id(&mut self, pushed: &Quote, id: QuoteId) -> Result<bool> {
        if self.get(id).is_some() {
            tracing::warn!("Remote assigned id {} that is already in use locally", id);
            return Ok(false);
        }
        let Some(record) = self.quotes.iter_mut().rev().find(|quote| {
            quote.id.is_none()
                && quote.text == pushed.text
                && quote.category == pushed.category
                && quote.updated_at == pushed.updated_at
        }) else {
            return Ok(false);
        };

        record.id = Some(id);
        tracing::debug!("Pushed quote now has remote id {}", id);
        self.persist_quotes()?;
        Ok(true)
    }

    /// The most recent local record the remote has not seen.
    pub fn push_candidate(&self, remote_ids: &BTreeSet<QuoteId>) -> Option<Quote> {
        push_candidate(&self.quotes, remote_ids)
    }

    /// Write the full sequence to the key-value store.
    pub fn persist_quotes(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.quotes)?;
        self.kv
            .set(QUOTES_KEY, &serialized)
            .inspect_err(|error| tracing::warn!("Failed to persist quotes: {}", error))
    }

    /// Timestamp id for a new quote, bumped past any id already in use.
    fn next_id(&self, now: i64) -> QuoteId {
        let highest = self
            .quotes
            .iter()
            .filter_map(|quote| quote.id.map(QuoteId::value))
            .max();
        match highest {
            Some(highest) if highest >= now => QuoteId::new(highest + 1),
            _ => QuoteId::new(now),
        }
    }
}

/// Lazy, restartable iterator over quotes matching a category filter.
#[derive(Clone)]
pub struct QuoteFilter<'a> {
    quotes: std::slice::Iter<'a, Quote>,
    selection: &'a CategoryFilter,
}

impl<'a> QuoteFilter<'a> {
    fn new(quotes: &'a [Quote], selection: &'a CategoryFilter) -> Self {
        Self {
            quotes: quotes.iter(),
            selection,
        }
    }
}

impl<'a> Iterator for QuoteFilter<'a> {
    type Item = &'a Quote;

    fn next(&mut self) -> Option<Self::Item> {
        let selection = self.selection;
        self.quotes.by_ref().find(|quote| selection.matches(quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn empty_store() -> (Arc<MemoryStore>, QuoteStore) {
        let kv = Arc::new(MemoryStore::with_entries([(QUOTES_KEY, "[]")]));
        let store = QuoteStore::load(kv.clone()).unwrap();
        (kv, store)
    }

    fn texts<'a>(quotes: impl Iterator<Item = &'a Quote>) -> Vec<&'a str> {
        quotes.map(|quote| quote.text.as_str()).collect()
    }

    #[test]
    fn load_seeds_defaults_when_nothing_stored() {
        let store = QuoteStore::load(Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.selected_category(), &CategoryFilter::All);
        assert_eq!(
            store.categories().into_iter().collect::<Vec<_>>(),
            vec!["Inspiration", "Motivation", "Resilience"]
        );
    }

    #[test]
    fn load_falls_back_on_unreadable_quotes() {
        let kv = Arc::new(MemoryStore::with_entries([(QUOTES_KEY, "{not json")]));
        let store = QuoteStore::load(kv.clone()).unwrap();
        assert_eq!(store.len(), 3);
        // Left alone until the next mutation.
        assert_eq!(kv.get(QUOTES_KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn load_restores_quotes_and_selection() {
        let kv = Arc::new(MemoryStore::with_entries([
            (
                QUOTES_KEY,
                r#"[{"id":1,"text":"a","category":"A","updatedAt":1}]"#,
            ),
            (SELECTED_CATEGORY_KEY, "A"),
        ]));
        let store = QuoteStore::load(kv).unwrap();
        assert_eq!(store.quotes(), &[Quote::with_id(1, "a", "A", 1)]);
        assert_eq!(
            store.selected_category(),
            &CategoryFilter::Category("A".to_string())
        );
    }

    #[test]
    fn load_propagates_store_failure() {
        let kv = Arc::new(MemoryStore::new());
        kv.set_unavailable(true);
        let error = QuoteStore::load(kv).err().unwrap();
        assert!(error.is_persistence());
    }

    #[test]
    fn add_appends_persists_and_is_retrievable() {
        let (kv, mut store) = empty_store();

        let quote = store.add("  Stay hungry. ", " Motivation ").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Motivation");
        assert_eq!(store.get(quote.id.unwrap()), Some(&quote));

        let persisted: Vec<Quote> =
            serde_json::from_str(&kv.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, vec![quote]);
    }

    #[test]
    fn add_rejects_blank_fields_without_mutation() {
        let (_kv, mut store) = empty_store();

        assert!(matches!(store.add("   ", "Motivation"), Err(Error::Validation(_))));
        assert!(matches!(store.add("text", "\t"), Err(Error::Validation(_))));
        assert!(matches!(store.add("", ""), Err(Error::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn add_assigns_distinct_ids_within_one_millisecond() {
        let (_kv, mut store) = empty_store();
        let ids: HashSet<_> = (0..50)
            .map(|n| store.add(&format!("quote {n}"), "Bulk").unwrap().id.unwrap())
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn add_keeps_quote_in_memory_when_store_fails() {
        let (kv, mut store) = empty_store();
        kv.set_unavailable(true);

        let error = store.add("Keep going.", "Resilience").unwrap_err();
        assert!(error.is_persistence());
        assert_eq!(texts(store.quotes().iter()), vec!["Keep going."]);
    }

    #[test]
    fn scenario_add_then_filter() {
        let (_kv, mut store) = empty_store();

        store.add("Stay hungry.", "Motivation").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.categories(),
            BTreeSet::from(["Motivation".to_string()])
        );

        store.add("Keep going.", "Resilience").unwrap();
        let resilience = store
            .filter(CategoryFilter::Category("Resilience".to_string()))
            .unwrap()
            .collect::<Vec<_>>();
        assert_eq!(resilience.len(), 1);
        assert_eq!(resilience[0].text, "Keep going.");
    }

    #[test]
    fn filter_all_preserves_order_and_category_is_exact() {
        let (_kv, mut store) = empty_store();
        store.add("one", "A").unwrap();
        store.add("two", "B").unwrap();
        store.add("three", "A").unwrap();
        store.add("four", "a").unwrap();

        let all = texts(store.filter(CategoryFilter::All).unwrap());
        assert_eq!(all, vec!["one", "two", "three", "four"]);

        let only_a = texts(store.filter(CategoryFilter::Category("A".into())).unwrap());
        assert_eq!(only_a, vec!["one", "three"]);

        let missing = texts(store.filter(CategoryFilter::Category("Z".into())).unwrap());
        assert!(missing.is_empty());
    }

    #[test]
    fn filter_is_restartable() {
        let (_kv, mut store) = empty_store();
        store.add("one", "A").unwrap();
        store.add("two", "A").unwrap();

        let filtered = store.filter(CategoryFilter::Category("A".into())).unwrap();
        let first_pass = texts(filtered.clone());
        let second_pass = texts(filtered);
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn filter_persists_selection() {
        let (kv, mut store) = empty_store();
        store
            .filter(CategoryFilter::Category("Motivation".into()))
            .unwrap()
            .for_each(drop);
        assert_eq!(
            kv.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("Motivation")
        );

        let restored = QuoteStore::load(kv.clone()).unwrap();
        assert_eq!(
            restored.selected_category(),
            &CategoryFilter::Category("Motivation".into())
        );

        store.filter(CategoryFilter::All).unwrap().for_each(drop);
        assert_eq!(kv.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(), Some("all"));
    }

    #[test]
    fn random_quote_respects_selection() {
        let (_kv, mut store) = empty_store();
        assert_eq!(store.random_quote(&CategoryFilter::All), None);

        store.add("one", "A").unwrap();
        store.add("two", "B").unwrap();

        let only_b = CategoryFilter::Category("B".into());
        for _ in 0..20 {
            assert_eq!(store.random_quote(&only_b).unwrap().text, "two");
        }
        assert_eq!(
            store.random_quote(&CategoryFilter::Category("C".into())),
            None
        );
        assert!(store.random_quote(&CategoryFilter::All).is_some());
    }

    #[test]
    fn export_then_import_roundtrip() {
        let (_kv, mut source) = empty_store();
        source.add("Stay hungry.", "Motivation").unwrap();
        source.add("Keep going.", "Resilience").unwrap();
        source
            .import_batch(r#"[{"text":"No id","category":"Misc"}]"#)
            .unwrap();

        let blob = source.export_all().unwrap();

        let (_kv, mut target) = empty_store();
        let count = target.import_batch(blob.text().unwrap()).unwrap();

        assert_eq!(count, 3);
        assert_eq!(target.quotes(), source.quotes());
    }

    #[test]
    fn scenario_import_appends_after_existing() {
        let (kv, mut store) = empty_store();
        store.add("Existing", "Old").unwrap();

        store
            .import_batch(r#"[{"text":"X","category":"Y"}]"#)
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.quotes()[1].text, "X");
        assert_eq!(store.quotes()[1].category, "Y");

        let persisted: Vec<Quote> =
            serde_json::from_str(&kv.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 2);
    }

    #[test]
    fn import_does_not_deduplicate() {
        let (_kv, mut store) = empty_store();
        let payload = r#"[{"id":1,"text":"X","category":"Y","updatedAt":1}]"#;
        store.import_batch(payload).unwrap();
        store.import_batch(payload).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn malformed_import_leaves_store_untouched() {
        let (kv, mut store) = empty_store();
        store.add("Existing", "Old").unwrap();
        let before = kv.get(QUOTES_KEY).unwrap();

        assert!(matches!(store.import_batch("not json"), Err(Error::ImportParse(_))));
        assert!(matches!(
            store.import_batch(r#"{"text":"X"}"#),
            Err(Error::ImportParse(_))
        ));

        assert_eq!(texts(store.quotes().iter()), vec!["Existing"]);
        assert_eq!(kv.get(QUOTES_KEY).unwrap(), before);
    }

    #[test]
    fn merge_remote_replaces_newer_and_appends_unknown() {
        let (_kv, mut store) = empty_store();
        store
            .import_batch(r#"[{"id":1,"text":"local","category":"A","updatedAt":100}]"#)
            .unwrap();

        let report = store.merge_remote(vec![
            Quote::with_id(1, "remote", "A", 150),
            Quote::with_id(2, "new", "B", 10),
        ]);

        assert_eq!(report.updated, 1);
        assert_eq!(report.added, 1);
        assert_eq!(texts(store.quotes().iter()), vec!["remote", "new"]);
    }

    #[test]
    fn adopt_remote_id_fills_missing_id_and_persists() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = QuoteStore::load(kv.clone()).unwrap();
        let seed = store.quotes()[2].clone();
        assert_eq!(seed.id, None);

        assert!(store.adopt_remote_id(&seed, QuoteId::new(101)).unwrap());
        assert_eq!(store.get(QuoteId::new(101)).map(|quote| &quote.text), Some(&seed.text));
        assert!(!store.adopt_remote_id(&seed, QuoteId::new(102)).unwrap());

        let persisted: Vec<Quote> =
            serde_json::from_str(&kv.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, store.quotes());
    }

    #[test]
    fn adopt_remote_id_refuses_ids_in_use() {
        let (_kv, mut store) = empty_store();
        store
            .import_batch(r#"[{"id":5,"text":"taken","category":"A"},{"text":"fresh","category":"A"}]"#)
            .unwrap();
        let fresh = store.quotes()[1].clone();

        assert!(!store.adopt_remote_id(&fresh, QuoteId::new(5)).unwrap());
        assert_eq!(store.quotes()[1].id, None);
    }

    #[test]
    fn push_candidate_is_latest_local_only_record() {
        let (_kv, mut store) = empty_store();
        let mine = store.add("mine", "A").unwrap();
        store.merge_remote(vec![Quote::with_id(1, "theirs", "B", 1)]);

        let remote_ids = BTreeSet::from([QuoteId::new(1)]);
        assert_eq!(store.push_candidate(&remote_ids), Some(mine));
    }
}
