//! SQLite-backed store client
//!
//! Persists every collection in one `records` table keyed by
//! `(collection, id)` with the record body stored as JSON text. Query
//! evaluation (order/limit/projection) happens in process after the load, so
//! the client honors exactly the same semantics as the in-memory store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde_json::{Map, Value};
use ulid::Ulid;

use crate::core::error::AccessError;
use crate::core::record::{Record, StoredRecord};
use crate::store::client::{SelectQuery, StoreClient};
use crate::store::schema::CollectionSchemas;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    schemas: CollectionSchemas,
}

impl SqliteStore {
    /// Open or create a store database at the given path.
    pub fn open(path: &Path) -> Result<Self, AccessError> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::with_connection(conn)
    }

    /// Open a private in-memory store database.
    pub fn open_in_memory() -> Result<Self, AccessError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, AccessError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );
            CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);
            "#,
        )
        .map_err(db_error)?;

        Ok(Self {
            conn: Mutex::new(conn),
            schemas: CollectionSchemas::new(),
        })
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

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_record(
        conn: &Connection,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredRecord>, AccessError> {
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;

        body.map(|b| StoredRecord::from_json_str(&b)).transpose()
    }
}

#[async_trait]
impl StoreClient for SqliteStore {
    async fn select(
        &self,
        collection: &str,
        query: &SelectQuery,
    ) -> Result<Vec<StoredRecord>, AccessError> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare("SELECT body FROM records WHERE collection = ?1 ORDER BY rowid")
            .map_err(db_error)?;
        let bodies = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))
            .map_err(db_error)?;

        let mut records = Vec::new();
        for body in bodies {
            let body = body.map_err(db_error)?;
            records.push(StoredRecord::from_json_str(&body)?);
        }
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
        let body = serde_json::to_string(&record).map_err(|e| AccessError::Validation {
            message: format!("record body is not serializable: {}", e),
        })?;

        let conn = self.lock();
        conn.execute(
            "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection, record.id(), body],
        )
        .map_err(|e| {
            if constraint_violation(&e) {
                AccessError::Validation {
                    message: format!(
                        "duplicate id '{}' in collection '{}'",
                        record.id(),
                        collection
                    ),
                }
            } else {
                db_error(e)
            }
        })?;

        Ok(record)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<StoredRecord, AccessError> {
        let conn = self.lock();
        let mut record =
            Self::load_record(&conn, collection, id)?.ok_or_else(|| AccessError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        record.apply_patch(patch);
        self.schemas
            .check(collection, &Value::Object(record.fields().clone()))?;

        let body = serde_json::to_string(&record).map_err(|e| AccessError::Validation {
            message: format!("record body is not serializable: {}", e),
        })?;
        conn.execute(
            "UPDATE records SET body = ?3 WHERE collection = ?1 AND id = ?2",
            params![collection, id, body],
        )
        .map_err(db_error)?;

        Ok(record)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), AccessError> {
        let conn = self.lock();
        let affected = conn
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .map_err(db_error)?;

        if affected == 0 {
            return Err(AccessError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn db_error(err: rusqlite::Error) -> AccessError {
    AccessError::transport(err.to_string())
}
