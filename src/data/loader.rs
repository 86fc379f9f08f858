use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader};

use super::dictionary;
use super::model::{FieldValue, Record, Table};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file on disk.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first sheet, first row is the header
/// * `.csv` – first line is the header
pub fn load_file(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_bytes(&name, &bytes)
}

/// Load a table from an in-memory file (e.g. a drop that carries bytes
/// rather than a path). `file_name` only selects the format.
pub fn load_bytes(file_name: &str, bytes: &[u8]) -> Result<Table> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(bytes)?,
        "csv" => read_csv(bytes)?,
        other => {
            return Err(Error::Parse(format!("unsupported file extension: .{other}")));
        }
    };
    table_from_rows(rows)
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<FieldValue>>> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::Parse(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Parse("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::Parse(format!("sheet '{sheet_name}': {e}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::Null,
        Data::String(s) => FieldValue::from_sheet_text(s),
        Data::Int(i) => FieldValue::Integer(*i),
        Data::Float(f) => FieldValue::from_f64(*f),
        Data::Bool(b) => FieldValue::Bool(*b),
        // Dates, durations and error cells keep their display form.
        other => FieldValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<FieldValue>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::Parse(format!("CSV row {row_no}: {e}")))?;
        rows.push(record.iter().map(FieldValue::guess).collect());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Rows → Table
// ---------------------------------------------------------------------------

/// Turn raw rows into a table. The first row names the columns; a second
/// row that repeats the header's dictionary labels (as `json_to_xlsx` writes
/// it) is skipped.
fn table_from_rows(mut rows: Vec<Vec<FieldValue>>) -> Result<Table> {
    while rows
        .last()
        .is_some_and(|row| row.iter().all(FieldValue::is_blank))
    {
        rows.pop();
    }

    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| Error::Parse("no header row".to_string()))?;

    // (cell index, column name); blank header cells are ignored, other names
    // are kept verbatim apart from a leading BOM.
    let columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| (i, header_name(cell)))
        .filter(|(_, name)| !name.trim().is_empty())
        .collect();

    if columns.is_empty() {
        return Err(Error::Parse("no header row".to_string()));
    }

    let mut rows = rows.peekable();
    if rows.peek().is_some_and(|row| is_label_row(&columns, row)) {
        log::debug!("skipping dictionary label row");
        rows.next();
    }

    let records: Vec<Record> = rows
        .filter(|row| !row.iter().all(FieldValue::is_blank))
        .map(|row| {
            columns
                .iter()
                .filter_map(|(idx, name)| {
                    let value = row.get(*idx)?;
                    (!value.is_blank()).then(|| (name.clone(), value.clone()))
                })
                .collect()
        })
        .collect();

    Ok(Table::new(
        columns.into_iter().map(|(_, name)| name).collect(),
        records,
    ))
}

fn header_name(cell: &FieldValue) -> String {
    cell.to_string().trim_start_matches('\u{feff}').to_string()
}

fn is_label_row(columns: &[(usize, String)], row: &[FieldValue]) -> bool {
    columns.iter().all(|(idx, name)| {
        row.get(*idx)
            .is_some_and(|cell| cell.to_string().trim() == dictionary::label_for(name).trim())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell.parse::<f64>() {
                    Ok(n) => sheet.write_number(r as u32, c as u16, n).unwrap(),
                    Err(_) => sheet.write_string(r as u32, c as u16, *cell).unwrap(),
                };
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_first_row_names_columns() {
        let bytes = workbook_bytes(&[
            &["timeMinute", "watchUcnt", "c"],
            &["10:01", "5", "Alice"],
            &["10:02", "7.5", ""],
        ]);
        let table = load_bytes("live.xlsx", &bytes).unwrap();

        assert_eq!(table.columns, vec!["timeMinute", "watchUcnt", "c"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.records[0].get("watchUcnt"),
            Some(&FieldValue::Integer(5))
        );
        assert_eq!(
            table.records[1].get("watchUcnt"),
            Some(&FieldValue::Float(7.5))
        );
        assert!(table.records[1].get("c").is_none());
    }

    #[test]
    fn test_label_row_is_skipped() {
        let bytes = workbook_bytes(&[
            &["timeMinute", "watchUcnt", "groupPlay"],
            &["时刻", "进入直播间人数", "groupPlay"],
            &["1", "5", "x"],
        ]);
        let table = load_bytes("live.xlsx", &bytes).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.records[0].get("timeMinute"),
            Some(&FieldValue::Integer(1))
        );
    }

    #[test]
    fn test_empty_sheet_has_no_header() {
        let bytes = workbook_bytes(&[]);
        let err = load_bytes("empty.xlsx", &bytes).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "{err}");
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let err = load_bytes("broken.xlsx", b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "{err}");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_bytes("notes.txt", b"timeMinute\n1\n").unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn test_csv_with_bom_and_blank_lines() {
        let csv = "\u{feff}timeMinute,watchUcnt,music\n1,5,SongX\n,,\n2,6,\n";
        let table = load_bytes("live.csv", csv.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["timeMinute", "watchUcnt", "music"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.records[1].get("watchUcnt"),
            Some(&FieldValue::Integer(6))
        );
    }

    #[test]
    fn test_header_names_are_kept_verbatim() {
        let bytes = workbook_bytes(&[&["timeMinute", " padded ", "   "], &["1", "2", "3"]]);
        let table = load_bytes("live.xlsx", &bytes).unwrap();
        assert_eq!(table.columns, vec!["timeMinute", " padded "]);
        assert_eq!(
            table.records[0].get(" padded "),
            Some(&FieldValue::Integer(2))
        );
    }

    #[test]
    fn test_missing_file_is_io() {
        let err = load_file(Path::new("/nonexistent/live.xlsx")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
