//! Store module - collection access, caching, and store clients

pub mod accessor;
pub mod cache;
pub mod client;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use accessor::{CollectionAccessor, FetchState};
pub use cache::{CacheStats, CacheStore};
pub use client::{OrderBy, SelectQuery, StoreClient};
pub use memory::MemoryStore;
pub use schema::CollectionSchemas;
pub use sqlite::SqliteStore;
