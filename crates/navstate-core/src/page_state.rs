//! Per-page snapshot cache.
//!
//! Screens save far more often than their state actually changes, so every
//! entry keeps the serialized form it was last saved with and a save of an
//! equal snapshot is reported as [`SaveOutcome::Unchanged`].

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use lru::LruCache;
use navstate_model::PageId;
use serde_json::Value;

/// Result of [`PageStateStore::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Unchanged,
    Updated,
}

#[derive(Debug)]
struct CachedState {
    snapshot: Value,
    serialized: String,
}

impl CachedState {
    fn new(snapshot: Value) -> Self {
        let serialized = snapshot.to_string();
        Self {
            snapshot,
            serialized,
        }
    }
}

/// Bounded cache of page snapshots, least recently saved evicted first.
#[derive(Debug)]
pub struct PageStateStore {
    entries: LruCache<PageId, CachedState>,
}

impl PageStateStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn save(&mut self, page_id: &PageId, snapshot: Value) -> SaveOutcome {
        let state = CachedState::new(snapshot);
        if let Some(existing) = self.entries.get(page_id)
            && existing.serialized == state.serialized
        {
            tracing::trace!(page_id = %page_id, "page state unchanged");
            return SaveOutcome::Unchanged;
        }

        if let Some((evicted, _)) = self.entries.push(page_id.clone(), state)
            && &evicted != page_id
        {
            tracing::debug!(page_id = %evicted, "evicted page state");
        }
        SaveOutcome::Updated
    }

    pub fn get(&self, page_id: &PageId) -> Option<&Value> {
        self.entries.peek(page_id).map(|state| &state.snapshot)
    }

    pub fn remove(&mut self, page_id: &PageId) -> bool {
        self.entries.pop(page_id).is_some()
    }

    /// Replace the cache with restored snapshots, seeding the comparison
    /// cache so an unchanged re-save is recognized as a no-op.
    ///
    /// Restored entries rank as least recent, in key order.
    pub fn hydrate(&mut self, states: BTreeMap<PageId, Value>) {
        self.entries.clear();
        for (page_id, snapshot) in states {
            self.entries.push(page_id, CachedState::new(snapshot));
        }
    }

    pub fn to_map(&self) -> BTreeMap<PageId, Value> {
        self.entries
            .iter()
            .map(|(page_id, state)| (page_id.clone(), state.snapshot.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
