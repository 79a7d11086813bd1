//! Entity list controller
//!
//! Pure presentation logic over an already-fetched record collection: which
//! rows are visible, in what order, which filter values to offer, and what
//! reaches the export serializers. Persistence stays with the screen; the
//! controller only signals intent (the confirmed delete record).

use crate::core::column::Column;
use crate::core::config::ExportConfig;
use crate::core::error::ExportError;
use crate::core::record::{FieldValue, Record};
use crate::export::{self, ExportArtifact, ExportFormat};
use crate::list::state::{
    DeleteConfirmation, FilterValue, ListState, RowActions, SortConfig, SortDirection,
};

/// Number of placeholder rows rendered while a fetch is in flight
pub const SKELETON_ROW_COUNT: usize = 5;

/// What the table widget should render for the current state
#[derive(Debug, PartialEq)]
pub enum TableBody<'a, R> {
    /// Fetch in flight: fixed number of skeleton rows matching the column count
    Loading { rows: usize, columns: usize },
    /// Nothing matched: one centered row spanning all columns
    Empty { span: usize },
    Rows(Vec<&'a R>),
}

/// Generic search/filter/sort/export/delete-confirmation engine for one
/// list screen.
///
/// Records pass through a fixed pipeline - search filter, column filter,
/// then sort - so sort order and row indices always refer to the filtered
/// view. Rows failing either filter are excluded entirely: not rendered,
/// not exported, not counted.
pub struct ListController<R: Record> {
    columns: Vec<Column<R>>,
    action_column: Column<R>,
    actions: RowActions,
    state: ListState,
    delete_confirmation: DeleteConfirmation<R>,
}

impl<R: Record> ListController<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            action_column: Column::actions(),
            actions: RowActions::default(),
            state: ListState::default(),
            delete_confirmation: DeleteConfirmation::Inactive,
        }
    }

    /// Declare which row actions this screen offers.
    pub fn with_actions(mut self, actions: RowActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn actions(&self) -> RowActions {
        self.actions
    }

    // ----- state transitions -------------------------------------------------

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.state.search = query.into();
    }

    /// Select the filter column, resetting the value selection.
    pub fn set_filter_column(&mut self, column: Option<String>) {
        self.state.filter_column = column;
        self.state.filter_value = FilterValue::All;
    }

    pub fn set_filter_value(&mut self, value: FilterValue) {
        self.state.filter_value = value;
    }

    /// Cycle the sort on a column: ascending, descending, then unsorted.
    ///
    /// A different column resets to ascending. Unsortable and unknown
    /// columns never produce a sort.
    pub fn toggle_sort(&mut self, key: &str) {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key() == key && c.is_sortable());
        if !sortable {
            return;
        }

        self.state.sort = match self.state.sort.take() {
            Some(SortConfig {
                key: current,
                direction,
            }) if current == key => match direction {
                SortDirection::Ascending => Some(SortConfig {
                    key: current,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortConfig {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            }),
        };
    }

    // ----- visible rows ------------------------------------------------------

    /// The searched, filtered, and sorted view of the collection.
    pub fn visible_rows<'a>(&self, records: &'a [R]) -> Vec<&'a R> {
        let mut rows: Vec<&R> = records
            .iter()
            .filter(|r| self.matches_search(*r))
            .filter(|r| self.matches_filter(*r))
            .collect();

        if let Some(sort) = &self.state.sort {
            rows.sort_by(|a, b| {
                let left = a.field(&sort.key).unwrap_or(FieldValue::Null);
                let right = b.field(&sort.key).unwrap_or(FieldValue::Null);
                let ord = left.compare(&right);
                match sort.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        rows
    }

    fn matches_search(&self, record: &R) -> bool {
        if self.state.search.is_empty() {
            return true;
        }
        let needle = self.state.search.to_lowercase();
        record.field_names().iter().any(|name| {
            record
                .field(name)
                .map(|v| v.display().to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    fn matches_filter(&self, record: &R) -> bool {
        let Some(column) = &self.state.filter_column else {
            return true;
        };
        let FilterValue::Value(wanted) = &self.state.filter_value else {
            return true;
        };
        let actual = record
            .field(column)
            .map(|v| v.display())
            .unwrap_or_default();
        actual.to_lowercase() == wanted.to_lowercase()
    }

    /// Candidate values for the filter dropdown.
    ///
    /// Distinct string projections of the filter column across the
    /// UNFILTERED collection, deduplicated and sorted ascending, so the
    /// options never shrink while other filters are active. A blank
    /// projection stays in the list; rendering it as a placeholder is the
    /// dropdown widget's concern.
    pub fn filter_values(&self, records: &[R]) -> Vec<String> {
        let Some(column) = &self.state.filter_column else {
            return Vec::new();
        };
        let values: std::collections::BTreeSet<String> = records
            .iter()
            .map(|r| r.field(column).map(|v| v.display()).unwrap_or_default())
            .collect();
        values.into_iter().collect()
    }

    // ----- table rendering ---------------------------------------------------

    /// Columns the table widget renders, action menu included when offered.
    pub fn table_columns(&self) -> Vec<&Column<R>> {
        let mut columns: Vec<&Column<R>> = self.columns.iter().collect();
        if self.actions.any() {
            columns.push(&self.action_column);
        }
        columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len() + usize::from(self.actions.any())
    }

    /// Resolve what the table body should show for the current fetch state.
    pub fn table_body<'a>(&self, records: &'a [R], is_loading: bool) -> TableBody<'a, R> {
        if is_loading {
            return TableBody::Loading {
                rows: SKELETON_ROW_COUNT,
                columns: self.column_count(),
            };
        }
        let rows = self.visible_rows(records);
        if rows.is_empty() {
            TableBody::Empty {
                span: self.column_count(),
            }
        } else {
            TableBody::Rows(rows)
        }
    }

    // ----- delete confirmation ----------------------------------------------

    pub fn pending_delete(&self) -> Option<&R> {
        match &self.delete_confirmation {
            DeleteConfirmation::Confirming(record) => Some(record),
            DeleteConfirmation::Inactive => None,
        }
    }

    pub fn request_delete(&mut self, record: R) {
        self.delete_confirmation = DeleteConfirmation::Confirming(record);
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation = DeleteConfirmation::Inactive;
    }

    /// Confirm the pending delete, handing the record back for the screen's
    /// delete callback. Resets to inactive regardless of what the screen
    /// does with it; failure handling stays with the screen.
    pub fn confirm_delete(&mut self) -> Option<R> {
        match std::mem::take(&mut self.delete_confirmation) {
            DeleteConfirmation::Confirming(record) => Some(record),
            DeleteConfirmation::Inactive => None,
        }
    }

    // ----- export ------------------------------------------------------------

    /// Columns handed to the serializers: the schema minus the action marker.
    pub fn export_columns(&self) -> Vec<&Column<R>> {
        self.columns
            .iter()
            .filter(|c| !c.is_action_column())
            .collect()
    }

    /// Produce an export artifact from the currently visible rows.
    ///
    /// Exports always operate on the searched+filtered+sorted view, never
    /// the unfiltered collection.
    pub fn export(
        &self,
        format: ExportFormat,
        records: &[R],
        title: &str,
        config: &ExportConfig,
    ) -> Result<ExportArtifact, ExportError> {
        let rows = self.visible_rows(records);
        let columns = self.export_columns();
        export::export(format, &rows, &columns, title, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::StoredRecord;
    use serde_json::json;

    fn record(value: serde_json::Value) -> StoredRecord {
        let serde_json::Value::Object(map) = value else {
            panic!("fixture must be an object");
        };
        StoredRecord::from_fields(map).unwrap()
    }

    fn customers() -> Vec<StoredRecord> {
        vec![
            record(json!({"id": "1", "name": "Acme", "region": "North"})),
            record(json!({"id": "2", "name": "Zenith", "region": "South"})),
        ]
    }

    fn columns() -> Vec<Column<StoredRecord>> {
        vec![
            Column::new("name", "Name").sortable(),
            Column::new("region", "Region"),
        ]
    }

    fn ids(rows: &[&StoredRecord]) -> Vec<String> {
        rows.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_search_matches_any_field_substring() {
        let mut controller = ListController::new(columns());
        let records = customers();

        controller.set_search("ac");
        assert_eq!(ids(&controller.visible_rows(&records)), ["1"]);

        // Matches a non-column field too: search spans the whole record.
        controller.set_search("south");
        assert_eq!(ids(&controller.visible_rows(&records)), ["2"]);

        controller.set_search("");
        assert_eq!(controller.visible_rows(&records).len(), 2);
    }

    #[test]
    fn test_column_filter_case_insensitive_equality() {
        let mut controller = ListController::new(columns());
        let records = customers();

        controller.set_filter_column(Some("region".to_string()));
        controller.set_filter_value(FilterValue::Value("south".to_string()));
        assert_eq!(ids(&controller.visible_rows(&records)), ["2"]);

        controller.set_filter_value(FilterValue::All);
        assert_eq!(controller.visible_rows(&records).len(), 2);
    }

    #[test]
    fn test_changing_filter_column_resets_value() {
        let mut controller = ListController::new(columns());
        controller.set_filter_column(Some("region".to_string()));
        controller.set_filter_value(FilterValue::Value("South".to_string()));

        controller.set_filter_column(Some("name".to_string()));
        assert!(controller.state().filter_value.is_all());
    }

    #[test]
    fn test_sort_cycle_asc_desc_unsorted() {
        let mut controller = ListController::new(columns());
        let records = customers();

        controller.toggle_sort("name");
        assert_eq!(ids(&controller.visible_rows(&records)), ["1", "2"]);

        controller.toggle_sort("name");
        assert_eq!(ids(&controller.visible_rows(&records)), ["2", "1"]);

        controller.toggle_sort("name");
        assert!(controller.state().sort.is_none());
        assert_eq!(ids(&controller.visible_rows(&records)), ["1", "2"]);
    }

    #[test]
    fn test_sort_switching_column_resets_to_ascending() {
        let mut controller = ListController::new(vec![
            Column::<StoredRecord>::new("name", "Name").sortable(),
            Column::<StoredRecord>::new("region", "Region").sortable(),
        ]);

        controller.toggle_sort("name");
        controller.toggle_sort("name");
        controller.toggle_sort("region");

        let sort = controller.state().sort.as_ref().unwrap();
        assert_eq!(sort.key, "region");
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_unsortable_column_never_sorts() {
        let mut controller = ListController::new(columns());
        controller.toggle_sort("region");
        assert!(controller.state().sort.is_none());
        controller.toggle_sort("no-such-column");
        assert!(controller.state().sort.is_none());
    }

    #[test]
    fn test_numeric_sort_uses_natural_ordering() {
        let mut controller = ListController::new(vec![Column::new("units", "Units").sortable()]);
        let records = vec![
            record(json!({"id": "a", "units": 10})),
            record(json!({"id": "b", "units": 2})),
        ];

        controller.toggle_sort("units");
        assert_eq!(ids(&controller.visible_rows(&records)), ["b", "a"]);
    }

    #[test]
    fn test_filter_values_come_from_unfiltered_collection() {
        let mut controller = ListController::new(columns());
        let records = customers();

        controller.set_filter_column(Some("region".to_string()));
        // An active search must not shrink the offered values.
        controller.set_search("ac");
        assert_eq!(controller.filter_values(&records), ["North", "South"]);
    }

    #[test]
    fn test_filter_values_dedup_sort_and_keep_blank() {
        let mut controller = ListController::new(columns());
        let records = vec![
            record(json!({"id": "1", "region": "South"})),
            record(json!({"id": "2", "region": "North"})),
            record(json!({"id": "3", "region": "South"})),
            record(json!({"id": "4", "region": null})),
        ];

        controller.set_filter_column(Some("region".to_string()));
        assert_eq!(controller.filter_values(&records), ["", "North", "South"]);
    }

    #[test]
    fn test_table_body_states() {
        let mut controller =
            ListController::new(columns()).with_actions(RowActions::all());
        let records = customers();

        match controller.table_body(&records, true) {
            TableBody::Loading { rows, columns } => {
                assert_eq!(rows, SKELETON_ROW_COUNT);
                assert_eq!(columns, 3);
            }
            other => panic!("expected loading body, got {:?}", other),
        }

        controller.set_search("no-match-anywhere");
        match controller.table_body(&records, false) {
            TableBody::Empty { span } => assert_eq!(span, 3),
            other => panic!("expected empty body, got {:?}", other),
        }

        controller.set_search("");
        match controller.table_body(&records, false) {
            TableBody::Rows(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_action_column_only_when_actions_offered() {
        let plain = ListController::new(columns());
        assert_eq!(plain.column_count(), 2);
        assert!(plain.table_columns().iter().all(|c| !c.is_action_column()));

        let with_delete = ListController::new(columns()).with_actions(RowActions {
            delete: true,
            ..RowActions::default()
        });
        assert_eq!(with_delete.column_count(), 3);
        assert!(with_delete
            .table_columns()
            .last()
            .is_some_and(|c| c.is_action_column()));
        // The action marker never reaches the serializers.
        assert!(with_delete
            .export_columns()
            .iter()
            .all(|c| !c.is_action_column()));
    }

    #[test]
    fn test_delete_confirmation_flow() {
        let mut controller = ListController::new(columns());
        assert!(controller.confirm_delete().is_none());

        let target = record(json!({"id": "2", "name": "Zenith"}));
        controller.request_delete(target.clone());
        assert_eq!(controller.pending_delete().map(|r| r.id()), Some("2"));

        controller.cancel_delete();
        assert!(controller.pending_delete().is_none());

        controller.request_delete(target);
        let confirmed = controller.confirm_delete().unwrap();
        assert_eq!(confirmed.id(), "2");
        assert!(controller.pending_delete().is_none());
    }
}
