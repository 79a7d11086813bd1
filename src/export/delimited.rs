//! Delimited-text serializer
//!
//! One header line of column labels, one line per row of resolved display
//! values, fields joined by a fixed delimiter.
//!
//! Known limitation: field values containing the delimiter or a newline are
//! written as-is, with no quoting or escaping. Consumers that need embedded
//! delimiters should use the spreadsheet export instead.

use crate::core::column::Column;
use crate::core::record::Record;
use crate::export::resolve_table;

/// Serialize rows into delimited text. Empty row sets yield a header-only
/// artifact.
pub fn write_delimited<R: Record>(rows: &[&R], columns: &[&Column<R>], delimiter: char) -> String {
    let (headers, cells) = resolve_table(rows, columns);
    let sep = delimiter.to_string();

    let mut out = String::new();
    out.push_str(&headers.join(&sep));
    out.push('\n');
    for row in cells {
        out.push_str(&row.join(&sep));
        out.push('\n');
    }
    out
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

    #[test]
    fn test_header_and_rows() {
        let records = [
            record(json!({"id": "1", "name": "Acme", "region": "North"})),
            record(json!({"id": "2", "name": "Zenith", "region": "South"})),
        ];
        let rows: Vec<&StoredRecord> = records.iter().collect();
        let name = Column::new("name", "Name");
        let region = Column::new("region", "Region");
        let columns: Vec<&Column<StoredRecord>> = vec![&name, &region];

        let text = write_delimited(&rows, &columns, ',');
        assert_eq!(text, "Name,Region\nAcme,North\nZenith,South\n");
    }

    #[test]
    fn test_empty_rows_emit_header_only() {
        let rows: Vec<&StoredRecord> = Vec::new();
        let name = Column::new("name", "Name");
        let columns: Vec<&Column<StoredRecord>> = vec![&name];
        assert_eq!(write_delimited(&rows, &columns, ';'), "Name\n");
    }

    #[test]
    fn test_missing_field_uses_placeholder() {
        let records = [record(json!({"id": "1", "name": "Acme"}))];
        let rows: Vec<&StoredRecord> = records.iter().collect();
        let name = Column::new("name", "Name");
        let region = Column::new("region", "Region");
        let columns: Vec<&Column<StoredRecord>> = vec![&name, &region];

        assert_eq!(write_delimited(&rows, &columns, ','), "Name,Region\nAcme,-\n");
    }

    #[test]
    fn test_embedded_delimiter_is_not_escaped() {
        let records = [record(json!({"id": "1", "name": "Acme, Inc."}))];
        let rows: Vec<&StoredRecord> = records.iter().collect();
        let name = Column::new("name", "Name");
        let columns: Vec<&Column<StoredRecord>> = vec![&name];

        // The documented limitation: the comma passes through untouched.
        assert_eq!(write_delimited(&rows, &columns, ','), "Name\nAcme, Inc.\n");
    }
}
