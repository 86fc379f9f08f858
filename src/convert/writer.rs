use std::io::Write;
use std::path::{Component, Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::data::dictionary;
use crate::data::model::{FieldValue, Table, MAX_EXACT_INTEGER};
use crate::error::{Error, Result};

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "data";

/// Default output name: the source file's stem with an `.xlsx` extension.
/// An explicit name must be a single path component.
pub fn output_file_name(json_path: &Path, explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(name) => {
            let mut components = Path::new(name).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => Ok(name.to_string()),
                _ => Err(Error::InvalidOutputName(name.to_string())),
            }
        }
        None => {
            let stem = json_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            Ok(format!("{stem}.xlsx"))
        }
    }
}

/// Render `table` into an in-memory workbook.
///
/// Row 1 holds the field names, row 2 their dictionary labels (the field
/// name when it has none), then one row per record in `columns` order.
pub fn render_workbook(table: &Table, columns: &[String]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (c, field) in columns.iter().enumerate() {
        let col = column_index(c)?;
        sheet.write_string_with_format(0, col, field, &header)?;
        sheet.write_string_with_format(1, col, dictionary::label_for(field), &header)?;
    }
    sheet.set_freeze_panes(2, 0)?;

    for (r, record) in table.records.iter().enumerate() {
        let row = u32::try_from(r + 2).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (c, field) in columns.iter().enumerate() {
            let col = column_index(c)?;
            match record.values.get(field) {
                Some(FieldValue::Text(s)) => {
                    sheet.write_string(row, col, s)?;
                }
                Some(FieldValue::Integer(i)) if i.unsigned_abs() > MAX_EXACT_INTEGER => {
                    sheet.write_string(row, col, i.to_string())?;
                }
                Some(FieldValue::Integer(i)) => {
                    sheet.write_number(row, col, *i as f64)?;
                }
                Some(FieldValue::Float(v)) => {
                    sheet.write_number(row, col, *v)?;
                }
                Some(FieldValue::Bool(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Some(FieldValue::Null) | None => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write the workbook to `dest_dir/file_name`, creating `dest_dir` if needed.
///
/// The workbook is rendered before anything touches the disk and lands via
/// a temporary file renamed into place, so a failure leaves no partial file.
pub fn write_workbook(
    table: &Table,
    columns: &[String],
    dest_dir: &Path,
    file_name: &str,
) -> Result<PathBuf> {
    let bytes = render_workbook(table, columns)?;

    std::fs::create_dir_all(dest_dir).map_err(|e| Error::io(dest_dir, e))?;
    let path = dest_dir.join(file_name);

    let mut tmp = tempfile::NamedTempFile::new_in(dest_dir).map_err(|e| Error::io(dest_dir, e))?;
    tmp.write_all(&bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(&path).map_err(|e| Error::io(&path, e.error))?;

    log::info!(
        "wrote {} rows x {} columns to {}",
        table.len(),
        columns.len(),
        path.display()
    );
    Ok(path)
}

fn column_index(c: usize) -> Result<u16> {
    Ok(u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?)
}
