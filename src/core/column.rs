//! Column descriptors - how one field is labeled, sorted, and rendered

use crate::core::record::{FieldValue, Record};

/// Computed display override for a column.
///
/// Receives the value resolved through the column key (if any) together with
/// the whole record, so a column may derive its text from other fields.
pub type RenderFn<R> = Box<dyn Fn(Option<FieldValue>, &R) -> String + Send + Sync>;

/// Schema entry describing one column of a list screen.
///
/// The `key` is the sole join point between schema and record: sorting and
/// filtering resolve it with a direct field lookup. A column with a `render`
/// function may be computed, but then it should not be marked sortable.
pub struct Column<R> {
    key: String,
    label: String,
    sortable: bool,
    render: Option<RenderFn<R>>,
}

impl<R: Record> Column<R> {
    /// Reserved key marking the row-action menu column. Never exported.
    pub const ACTION_KEY: &'static str = "actions";

    /// Placeholder shown for a missing or null field.
    pub const MISSING_PLACEHOLDER: &'static str = "-";

    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            render: None,
        }
    }

    /// The reserved action-menu column.
    pub fn actions() -> Self {
        Self::new(Self::ACTION_KEY, "Actions")
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(Option<FieldValue>, &R) -> String + Send + Sync + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_action_column(&self) -> bool {
        self.key == Self::ACTION_KEY
    }

    /// Resolve the display text for one row.
    ///
    /// The shared input contract of every serializer: the render override when
    /// present, otherwise the field's string projection with a placeholder for
    /// missing or null values.
    pub fn display_value(&self, row: &R) -> String {
        let value = row.field(&self.key);
        match &self.render {
            Some(render) => render(value, row),
            None => match value {
                Some(v) if !v.is_null() => v.display(),
                _ => Self::MISSING_PLACEHOLDER.to_string(),
            },
        }
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("computed", &self.render.is_some())
            .finish()
    }
}
