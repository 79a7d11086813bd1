//! Shared per-collection snapshot cache
//!
//! One `CacheStore` is shared by every accessor of the same backing store, so
//! an invalidation issued by one screen is observed by all screens reading
//! that collection. Entries are written only by a successful list response
//! and destroyed only by explicit invalidation, unless a TTL is configured.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::record::StoredRecord;

#[derive(Debug, Clone)]
struct CacheEntry {
    records: Vec<StoredRecord>,
    stored_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub collections: usize,
    pub total_records: usize,
}

/// Snapshot cache keyed by collection name.
///
/// Cloning the store clones the handle, not the contents; all clones share
/// one entry table. Last writer wins, matching the backing store's own
/// last-write-wins semantics.
#[derive(Clone, Default)]
pub struct CacheStore {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Option<Duration>,
}

impl CacheStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Arc::default(),
            ttl,
        }
    }

    /// Fresh snapshot for a collection, if one is cached and unexpired.
    pub fn lookup(&self, collection: &str) -> Option<Vec<StoredRecord>> {
        let entries = self.lock();
        let entry = entries.get(collection)?;

        if let Some(ttl) = self.ttl {
            let age = Utc::now().signed_duration_since(entry.stored_at);
            if age.to_std().map_or(true, |age| age >= ttl) {
                debug!(collection, "cache entry expired");
                return None;
            }
        }

        debug!(collection, records = entry.records.len(), "cache hit");
        Some(entry.records.clone())
    }

    /// Store the snapshot from a successful list response.
    pub fn store(&self, collection: &str, records: Vec<StoredRecord>) {
        debug!(collection, records = records.len(), "cache store");
        self.lock().insert(
            collection.to_string(),
            CacheEntry {
                records,
                stored_at: Utc::now(),
            },
        );
    }

    /// Discard the cached snapshot so the next read refetches from the store.
    pub fn invalidate(&self, collection: &str) {
        debug!(collection, "cache invalidate");
        self.lock().remove(collection);
    }

    /// Discard every cached snapshot.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        CacheStats {
            collections: entries.len(),
            total_records: entries.values().map(|e| e.records.len()).sum(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("stats", &self.stats())
            .field("ttl", &self.ttl)
            .finish()
    }
}
