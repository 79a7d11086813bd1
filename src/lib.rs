//! Atrium: generic entity-list engine
//!
//! The reusable core behind a fleet of near-identical list-and-edit screens:
//! a list controller (search, multi-column filtering, sortable columns,
//! row actions, export triggers), a remote collection accessor (typed CRUD
//! with loading status and cache coherency after writes), and the export
//! serializers both feed into.
//!
//! Department screens compose a [`store::CollectionAccessor`] with a
//! [`list::ListController`] and their own form dialogs; the widget library,
//! routing, and role gating live entirely outside this crate.

pub mod core;
pub mod export;
pub mod list;
pub mod store;

pub use crate::core::{AccessError, Column, EngineConfig, ExportError, FieldValue, Record,
    StoredRecord};
pub use crate::export::{ExportArtifact, ExportFormat};
pub use crate::list::{ListController, RowActions, TableBody};
pub use crate::store::{CacheStore, CollectionAccessor, FetchState, SelectQuery, StoreClient};
