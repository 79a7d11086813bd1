//! Core module - record model, column schema, errors, configuration

pub mod column;
pub mod config;
pub mod error;
pub mod record;

pub use column::{Column, RenderFn};
pub use config::{CacheConfig, EngineConfig, ExportConfig};
pub use error::{AccessError, ExportError};
pub use record::{FieldValue, Record, StoredRecord};
