//! List screen state - search, filter, sort, actions, delete confirmation

/// Sort order for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Active sort: which column and which way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

/// Selected value of the column filter.
///
/// `All` is the neutral selection that passes every record, so the dropdown
/// can always offer it ahead of the concrete values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    #[default]
    All,
    Value(String),
}

impl FilterValue {
    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

/// Search/filter/sort state of one list screen instance.
///
/// Created empty when the screen mounts and discarded with it. The filter
/// value is only meaningful while a filter column is selected; changing the
/// column resets the value.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub search: String,
    pub filter_column: Option<String>,
    pub filter_value: FilterValue,
    pub sort: Option<SortConfig>,
}

/// Which row actions a screen offers.
///
/// The action menu column exists only when at least one flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowActions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl RowActions {
    pub fn all() -> Self {
        Self {
            view: true,
            edit: true,
            delete: true,
        }
    }

    pub fn any(&self) -> bool {
        self.view || self.edit || self.delete
    }
}

/// Delete confirmation sub-state.
///
/// Holds the record awaiting confirmation so the confirm step can hand it
/// back to the screen's delete callback.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteConfirmation<R> {
    Inactive,
    Confirming(R),
}

impl<R> Default for DeleteConfirmation<R> {
    fn default() -> Self {
        DeleteConfirmation::Inactive
    }
}

impl<R> DeleteConfirmation<R> {
    pub fn is_pending(&self) -> bool {
        matches!(self, DeleteConfirmation::Confirming(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_flip() {
        assert_eq!(SortDirection::Ascending.flip(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.flip(), SortDirection::Ascending);
    }

    #[test]
    fn test_filter_value_default_is_all() {
        assert!(FilterValue::default().is_all());
        assert!(!FilterValue::Value("north".to_string()).is_all());
    }

    #[test]
    fn test_row_actions_any() {
        assert!(!RowActions::default().any());
        assert!(RowActions::all().any());
        assert!(RowActions {
            delete: true,
            ..RowActions::default()
        }
        .any());
    }

    #[test]
    fn test_delete_confirmation_pending() {
        let idle: DeleteConfirmation<String> = DeleteConfirmation::Inactive;
        assert!(!idle.is_pending());
        assert!(DeleteConfirmation::Confirming("rec".to_string()).is_pending());
    }
}
