//! Spreadsheet serializer
//!
//! The same row/column projection as the delimited export, written as a
//! single-sheet binary workbook with one bold header row. Workbook metadata
//! is pinned to a fixed creation date so identical inputs produce identical
//! bytes.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};

use crate::core::column::Column;
use crate::core::error::ExportError;
use crate::core::record::Record;
use crate::export::resolve_table;

/// Serialize rows into a single-sheet workbook. Empty row sets yield a
/// header-only sheet.
pub fn write_workbook<R: Record>(
    rows: &[&R],
    columns: &[&Column<R>],
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let (headers, cells) = resolve_table(rows, columns);

    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new()
        .set_title(title)
        .set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, label) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, label, &header_format)?;
    }
    for (row, values) in cells.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            worksheet.write_string((row + 1) as u32, col as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
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
    fn test_workbook_is_nonempty_zip() {
        let records = [record(json!({"id": "1", "name": "Acme"}))];
        let rows: Vec<&StoredRecord> = records.iter().collect();
        let name = Column::new("name", "Name");
        let columns: Vec<&Column<StoredRecord>> = vec![&name];

        let bytes = write_workbook(&rows, &columns, "Customers").unwrap();
        // xlsx files are zip archives; check the magic bytes.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_rows_still_produce_workbook() {
        let rows: Vec<&StoredRecord> = Vec::new();
        let name = Column::new("name", "Name");
        let columns: Vec<&Column<StoredRecord>> = vec![&name];

        let bytes = write_workbook(&rows, &columns, "Customers").unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_identical_inputs_identical_bytes() {
        let records = [
            record(json!({"id": "1", "name": "Acme"})),
            record(json!({"id": "2", "name": "Zenith"})),
        ];
        let rows: Vec<&StoredRecord> = records.iter().collect();
        let name = Column::new("name", "Name");
        let columns: Vec<&Column<StoredRecord>> = vec![&name];

        let first = write_workbook(&rows, &columns, "Customers").unwrap();
        let second = write_workbook(&rows, &columns, "Customers").unwrap();
        assert_eq!(first, second);
    }
}
