//! Store transport trait - the accessor's only coupling to the backing store

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::core::error::AccessError;
use crate::core::record::{Record, StoredRecord};

/// Read options for a collection select.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// Columns to keep in the result; the id field is always retained.
    pub select: Option<Vec<String>>,

    /// Server-side ordering before the limit applies.
    pub order_by: Option<OrderBy>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl SelectQuery {
    pub fn ordered(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            order_by: Some(OrderBy {
                column: column.into(),
                ascending,
            }),
            ..Self::default()
        }
    }

    /// Apply ordering, limit, and column projection to fetched records.
    ///
    /// Clients whose backing store cannot evaluate the query natively run
    /// this after loading the collection, so every client honors the same
    /// semantics.
    pub fn apply(&self, mut records: Vec<StoredRecord>) -> Vec<StoredRecord> {
        if let Some(order) = &self.order_by {
            records.sort_by(|a, b| {
                let left = a
                    .field(&order.column)
                    .unwrap_or(crate::core::record::FieldValue::Null);
                let right = b
                    .field(&order.column)
                    .unwrap_or(crate::core::record::FieldValue::Null);
                let ord = left.compare(&right);
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        if let Some(keys) = &self.select {
            records = records.iter().map(|r| r.project(keys)).collect();
        }
        records
    }
}

/// Typed operations the backing relational store must provide.
///
/// Implementations return the taxonomy of [`AccessError`] directly: a
/// `delete_by_id` on an absent id reports `NotFound` here and the accessor
/// decides what that means for its caller.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Read the records of a named collection.
    async fn select(
        &self,
        collection: &str,
        query: &SelectQuery,
    ) -> Result<Vec<StoredRecord>, AccessError>;

    /// Insert one record; the store assigns an id when the payload has none.
    async fn insert_one(
        &self,
        collection: &str,
        payload: Map<String, Value>,
    ) -> Result<StoredRecord, AccessError>;

    /// Patch the record with the given id, returning the updated record.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<StoredRecord, AccessError>;

    /// Remove the record with the given id.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<(), AccessError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: &[Value]) -> Vec<StoredRecord> {
        values
            .iter()
            .map(|v| {
                let Value::Object(map) = v.clone() else {
                    panic!("fixture must be an object");
                };
                StoredRecord::from_fields(map).unwrap()
            })
            .collect()
    }

    fn fixture() -> Vec<StoredRecord> {
        records(&[
            json!({"id": "1", "name": "Zenith", "units": 10}),
            json!({"id": "2", "name": "Acme", "units": 2}),
            json!({"id": "3", "name": "Mid", "units": 5}),
        ])
    }

    #[test]
    fn test_apply_order_ascending() {
        let query = SelectQuery::ordered("units", true);
        let out = query.apply(fixture());
        let units: Vec<&str> = out.iter().map(|r| r.id()).collect();
        assert_eq!(units, ["2", "3", "1"]);
    }

    #[test]
    fn test_apply_order_descending_with_limit() {
        let query = SelectQuery {
            order_by: Some(OrderBy {
                column: "units".to_string(),
                ascending: false,
            }),
            limit: Some(2),
            ..SelectQuery::default()
        };
        let out = query.apply(fixture());
        let ids: Vec<&str> = out.iter().map(|r| r.id()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_apply_projection_keeps_id() {
        let query = SelectQuery {
            select: Some(vec!["name".to_string()]),
            ..SelectQuery::default()
        };
        let out = query.apply(fixture());
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| !r.id().is_empty()));
        assert!(out.iter().all(|r| r.get("units").is_none()));
    }

    #[test]
    fn test_apply_default_is_identity() {
        let out = SelectQuery::default().apply(fixture());
        let ids: Vec<&str> = out.iter().map(|r| r.id()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }
}
