//! Record trait - common interface over arbitrary record shapes

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::AccessError;

/// Common trait for anything the list engine can display, filter, and sort.
///
/// A record is an identity plus a mapping from column key to value. Screens
/// that work with typed structs implement this directly; data flowing through
/// the accessor uses [`StoredRecord`].
pub trait Record {
    /// Stable unique identity of the record.
    fn id(&self) -> &str;

    /// Look up a field by column key.
    ///
    /// Returns `None` when the record has no such field. Sortable and
    /// filterable columns must resolve through this lookup.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Names of every field on the record, for whole-record search.
    fn field_names(&self) -> Vec<String>;
}

/// Scalar field shapes the engine understands
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON value into a field value.
    ///
    /// Arrays are joined with ", " and objects fall back to their compact
    /// JSON form, so every field has a usable string projection.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => FieldValue::Text(
                items
                    .iter()
                    .map(|v| FieldValue::from_json(v).display())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }

    /// The canonical string projection used by search, filter, and export.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view of the value, when it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Natural ordering: numeric when both operands are numbers, lexical on
    /// the display projection otherwise.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => self.display().cmp(&other.display()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// The concrete record shape transported by the collection accessor.
///
/// A JSON object guaranteed to carry a non-empty string `"id"` field.
/// Construction goes through [`StoredRecord::from_fields`], which enforces
/// that invariant; everything else about the shape is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StoredRecord {
    fields: Map<String, Value>,
}

impl StoredRecord {
    /// Build a record from a JSON object, rejecting objects without a usable id.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, AccessError> {
        match fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Ok(Self { fields }),
            _ => Err(AccessError::Validation {
                message: "record is missing a non-empty string 'id' field".to_string(),
            }),
        }
    }

    /// Parse a record from its JSON text form.
    pub fn from_json_str(body: &str) -> Result<Self, AccessError> {
        let fields: Map<String, Value> =
            serde_json::from_str(body).map_err(|e| AccessError::Validation {
                message: format!("record body is not a JSON object: {}", e),
            })?;
        Self::from_fields(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Shallow-merge a patch into the record. The original id always wins.
    pub fn apply_patch(&mut self, patch: Map<String, Value>) {
        let id = self.fields.get("id").cloned();
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
        if let Some(id) = id {
            self.fields.insert("id".to_string(), id);
        }
    }

    /// Keep only the named fields. The id field is always retained.
    pub fn project(&self, keys: &[String]) -> StoredRecord {
        let mut fields = Map::new();
        for key in keys {
            if let Some(value) = self.fields.get(key) {
                fields.insert(key.clone(), value.clone());
            }
        }
        if let Some(id) = self.fields.get("id") {
            fields.insert("id".to_string(), id.clone());
        }
        Self { fields }
    }
}

impl Record for StoredRecord {
    fn id(&self) -> &str {
        match self.fields.get("id") {
            Some(Value::String(id)) => id,
            _ => "",
        }
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.get(key).map(FieldValue::from_json)
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }
}
