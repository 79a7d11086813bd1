//! List module - the entity list controller and its state machine

pub mod controller;
pub mod state;

pub use controller::{ListController, TableBody, SKELETON_ROW_COUNT};
pub use state::{
    DeleteConfirmation, FilterValue, ListState, RowActions, SortConfig, SortDirection,
};
