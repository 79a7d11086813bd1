//! Per-collection payload validation

use std::collections::HashMap;

use jsonschema::{validator_for, Validator as JsonValidator};
use serde_json::Value;

use crate::core::error::AccessError;

/// Compiled JSON Schemas keyed by collection name.
///
/// Store clients consult this before accepting an insert or update payload;
/// a collection without a registered schema accepts any object shape.
#[derive(Default)]
pub struct CollectionSchemas {
    validators: HashMap<String, JsonValidator>,
}

impl CollectionSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a schema for a collection.
    pub fn register(
        &mut self,
        collection: impl Into<String>,
        schema: &Value,
    ) -> Result<(), AccessError> {
        let validator = validator_for(schema).map_err(|e| AccessError::Validation {
            message: format!("invalid schema: {}", e),
        })?;
        self.validators.insert(collection.into(), validator);
        Ok(())
    }

    pub fn has_schema(&self, collection: &str) -> bool {
        self.validators.contains_key(collection)
    }

    /// Check a payload against the collection's schema, if one is registered.
    pub fn check(&self, collection: &str, payload: &Value) -> Result<(), AccessError> {
        let Some(validator) = self.validators.get(collection) else {
            return Ok(());
        };

        let violations: Vec<String> = validator
            .iter_errors(payload)
            .map(|err| {
                let path = err.instance_path.to_string();
                if path.is_empty() {
                    err.to_string()
                } else {
                    format!("{}: {}", path, err)
                }
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(AccessError::Validation {
                message: violations.join("; "),
            })
        }
    }
}

impl std::fmt::Debug for CollectionSchemas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSchemas")
            .field("collections", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
