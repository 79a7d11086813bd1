//! Remote collection accessor
//!
//! Wraps one named collection behind a [`StoreClient`] and gives every screen
//! the same read/mutate surface: cached list reads with loading status and
//! stale-data retention, and mutations that keep the shared cache coherent.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::error::AccessError;
use crate::core::record::StoredRecord;
use crate::store::cache::CacheStore;
use crate::store::client::{SelectQuery, StoreClient};

/// The loading/data/error triple describing the current view of a collection.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub records: Vec<StoredRecord>,
    pub is_loading: bool,
    pub error: Option<AccessError>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Typed read/mutate access to one named collection.
///
/// Accessors constructed with a clone of the same [`CacheStore`] observe each
/// other's invalidations, which is what keeps multiple screens over one
/// collection in sync after a write. Dropping an accessor mid-flight is safe:
/// its state dies with it and a late store response is never observed.
pub struct CollectionAccessor {
    collection: String,
    client: Arc<dyn StoreClient>,
    cache: CacheStore,
    state: Mutex<FetchState>,
}

impl CollectionAccessor {
    pub fn new(
        client: Arc<dyn StoreClient>,
        cache: CacheStore,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            client,
            cache,
            state: Mutex::new(FetchState::default()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Current snapshot without touching the store.
    pub fn state(&self) -> FetchState {
        self.lock().clone()
    }

    /// Read the collection.
    ///
    /// A cached, unexpired snapshot is returned without issuing a read.
    /// Otherwise one read goes to the store and `is_loading` transitions
    /// true then false exactly once; a `list` arriving while a read is in
    /// flight returns the current snapshot instead of starting a second one.
    /// On transport failure the previous records are retained and `error`
    /// is populated, so a flaky store degrades to stale data instead of a
    /// blank screen.
    pub async fn list(&self, query: &SelectQuery) -> FetchState {
        if let Some(records) = self.cache.lookup(&self.collection) {
            let mut state = self.lock();
            state.records = records;
            state.error = None;
            return state.clone();
        }

        {
            let mut state = self.lock();
            if state.is_loading {
                return state.clone();
            }
            state.is_loading = true;
        }

        debug!(collection = %self.collection, "issuing list read");
        let result = self.client.select(&self.collection, query).await;

        let mut state = self.lock();
        match result {
            Ok(records) => {
                self.cache.store(&self.collection, records.clone());
                state.records = records;
                state.error = None;
                state.fetched_at = Some(Utc::now());
            }
            Err(err) => {
                warn!(collection = %self.collection, %err, "list failed, retaining stale records");
                state.error = Some(err);
            }
        }
        state.is_loading = false;
        state.clone()
    }

    /// Insert a record, invalidating the collection's cache entry on success.
    pub async fn insert(&self, payload: Map<String, Value>) -> Result<StoredRecord, AccessError> {
        let record = self.client.insert_one(&self.collection, payload).await?;
        self.cache.invalidate(&self.collection);
        Ok(record)
    }

    /// Patch a record by id, invalidating the collection's cache entry on success.
    pub async fn update(
        &self,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<StoredRecord, AccessError> {
        let record = self.client.update_by_id(&self.collection, id, patch).await?;
        self.cache.invalidate(&self.collection);
        Ok(record)
    }

    /// Delete a record by id.
    ///
    /// Idempotent from the caller's perspective: deleting an id the store no
    /// longer holds reports success, since the desired end state is already
    /// achieved. The cache is only invalidated when the store confirms a
    /// deletion actually happened.
    pub async fn delete(&self, id: &str) -> Result<(), AccessError> {
        match self.client.delete_by_id(&self.collection, id).await {
            Ok(()) => {
                self.cache.invalidate(&self.collection);
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                debug!(collection = %self.collection, id, "delete target already absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FetchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
