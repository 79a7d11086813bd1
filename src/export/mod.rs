//! Export module - deterministic projections of visible rows into artifacts
//!
//! All three serializers share one input contract: for each row and column,
//! the display text comes from the column's render override when present,
//! otherwise the field's string projection with a placeholder for missing
//! values. They are pure - identical `(rows, columns, title)` always yield
//! byte-identical output - never mutate their input, and emit a header-only
//! artifact for an empty row set.

pub mod delimited;
pub mod document;
pub mod spreadsheet;

use crate::core::column::Column;
use crate::core::config::ExportConfig;
use crate::core::error::ExportError;
use crate::core::record::Record;

/// The three export targets every list screen offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Delimited text (spreadsheet-importable plain text)
    Delimited,
    /// Single-sheet binary workbook
    Spreadsheet,
    /// Titled, paginated document for hard copy
    PrintDocument,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Delimited => "csv",
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::PrintDocument => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Delimited => "text/csv",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::PrintDocument => "text/html",
        }
    }
}

/// A finished export, ready to hand to the file-save mechanism.
///
/// The core does not perform or await the save itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize rows and columns into the requested format.
///
/// The reserved action column is stripped here, so it can never leak into an
/// artifact regardless of the caller.
pub fn export<R: Record>(
    format: ExportFormat,
    rows: &[&R],
    columns: &[&Column<R>],
    title: &str,
    config: &ExportConfig,
) -> Result<ExportArtifact, ExportError> {
    let columns: Vec<&Column<R>> = columns
        .iter()
        .filter(|c| !c.is_action_column())
        .copied()
        .collect();

    let bytes = match format {
        ExportFormat::Delimited => delimited::write_delimited(rows, &columns, config.delimiter)
            .into_bytes(),
        ExportFormat::Spreadsheet => spreadsheet::write_workbook(rows, &columns, title)?,
        ExportFormat::PrintDocument => {
            document::render_print_document(rows, &columns, title, config.rows_per_page)?
                .into_bytes()
        }
    };

    Ok(ExportArtifact {
        filename: format!("{}.{}", slugify(title), format.extension()),
        content_type: format.content_type(),
        bytes,
    })
}

/// Resolve the header labels and display cells the serializers agree on.
pub(crate) fn resolve_table<R: Record>(
    rows: &[&R],
    columns: &[&Column<R>],
) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = columns.iter().map(|c| c.label().to_string()).collect();
    let cells = rows
        .iter()
        .map(|row| columns.iter().map(|c| c.display_value(row)).collect())
        .collect();
    (headers, cells)
}

fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    let mut out = String::with_capacity(slug.len());
    let mut last_dash = false;
    for c in slug.chars() {
        if c == '-' {
            if !last_dash {
                out.push(c);
            }
            last_dash = true;
        } else {
            out.push(c);
            last_dash = false;
        }
    }
    if out.is_empty() {
        "export".to_string()
    } else {
        out
    }
}
