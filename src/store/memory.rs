//! In-memory store client for fixtures, demos, and tests

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};
use ulid::Ulid;

use crate::core::error::AccessError;
use crate::core::record::{Record, StoredRecord};
use crate::store::client::{SelectQuery, StoreClient};
use crate::store::schema::CollectionSchemas;

/// A store client holding every collection in process memory.
///
/// Honors the same typed-failure contract as the SQLite client: duplicate ids
/// and schema violations are `Validation`, mutations on absent ids are
/// `NotFound`.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<StoredRecord>>>,
    schemas: CollectionSchemas,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a JSON Schema that insert/update payloads must satisfy.
    pub fn with_schema(
        mut self,
        collection: impl Into<String>,
        schema: &Value,
    ) -> Result<Self, AccessError> {
        self.schemas.register(collection, schema)?;
        Ok(self)
    }

    /// Seed a collection with records, replacing any existing contents.
    pub fn seed(&self, collection: impl Into<String>, records: Vec<StoredRecord>) {
        self.lock().insert(collection.into(), records);
    }

    /// Number of records currently held for a collection.
    pub fn record_count(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, Vec::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<StoredRecord>>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn select(
        &self,
        collection: &str,
        query: &SelectQuery,
    ) -> Result<Vec<StoredRecord>, AccessError> {
        let records = self.lock().get(collection).cloned().unwrap_or_default();
        Ok(query.apply(records))
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut payload: Map<String, Value>,
    ) -> Result<StoredRecord, AccessError> {
        self.schemas
            .check(collection, &Value::Object(payload.clone()))?;

        if !matches!(payload.get("id"), Some(Value::String(id)) if !id.is_empty()) {
            payload.insert("id".to_string(), Value::String(Ulid::new().to_string()));
        }
        let record = StoredRecord::from_fields(payload)?;

        let mut collections = self.lock();
        let records = collections.entry(collection.to_string()).or_default();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(AccessError::Validation {
                message: format!("duplicate id '{}' in collection '{}'", record.id(), collection),
            });
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<StoredRecord, AccessError> {
        let mut collections = self.lock();
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| AccessError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| AccessError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let mut updated = record.clone();
        updated.apply_patch(patch);
        self.schemas
            .check(collection, &Value::Object(updated.fields().clone()))?;

        *record = updated.clone();
        Ok(updated)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), AccessError> {
        let mut collections = self.lock();
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| AccessError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(AccessError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
