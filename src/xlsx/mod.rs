//! `.xlsx` reading into the worksheet grid.
//!
//! Only the first worksheet is read. Legacy `.xls` and other formats are
//! rejected by [`ensure_xlsx`] before any parsing happens.
//!
//! # Example
//!
//! ```ignore
//! use facturi::xlsx::read_sheet;
//!
//! let sheet = read_sheet(Path::new("facturi_2023.xlsx"))?;
//! ```

use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::core::{Cell, ConvertError, Sheet};

/// File-type gate: accept only the `.xlsx` extension (any case).
pub fn ensure_xlsx(path: &Path) -> Result<(), ConvertError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Ok(()),
        _ => Err(ConvertError::UnsupportedFile(format!(
            "{} is not an .xlsx file",
            path.display()
        ))),
    }
}

/// Read the first worksheet of an `.xlsx` file.
pub fn read_sheet(path: &Path) -> Result<Sheet, ConvertError> {
    ensure_xlsx(path)?;
    let workbook: Xlsx<_> = open_workbook(path).map_err(spreadsheet_err)?;
    first_sheet(workbook)
}

/// Read the first worksheet of an in-memory `.xlsx` file.
pub fn read_sheet_from_bytes(bytes: &[u8]) -> Result<Sheet, ConvertError> {
    let workbook = Xlsx::new(Cursor::new(bytes)).map_err(spreadsheet_err)?;
    first_sheet(workbook)
}

fn first_sheet<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> Result<Sheet, ConvertError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::Spreadsheet("workbook contains no worksheets".into()))?
        .map_err(spreadsheet_err)?;

    // Data may not begin at A1.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut sheet = Sheet::new();
    for (row_idx, row) in range.rows().enumerate() {
        for (col_idx, data) in row.iter().enumerate() {
            let cell = to_cell(data);
            if cell != Cell::Empty {
                sheet.set(
                    start_row as usize + row_idx + 1,
                    start_col as usize + col_idx,
                    cell,
                );
            }
        }
    }

    tracing::debug!(rows = sheet.row_count(), "worksheet loaded");
    Ok(sheet)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Dates keep their serial value.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::Error(e) => Cell::Error(e.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

fn spreadsheet_err(e: XlsxError) -> ConvertError {
    ConvertError::Spreadsheet(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_accepts_only_xlsx() {
        assert!(ensure_xlsx(Path::new("facturi.xlsx")).is_ok());
        assert!(ensure_xlsx(Path::new("FACTURI.XLSX")).is_ok());
        assert!(matches!(
            ensure_xlsx(Path::new("facturi.xls")),
            Err(ConvertError::UnsupportedFile(_))
        ));
        assert!(ensure_xlsx(Path::new("facturi")).is_err());
    }

    #[test]
    fn garbage_bytes_are_a_spreadsheet_error() {
        let err = read_sheet_from_bytes(b"not a zip archive").unwrap_err();
        assert!(matches!(err, ConvertError::Spreadsheet(_)));
    }

    #[test]
    fn non_xlsx_path_rejected_before_opening() {
        let err = read_sheet(Path::new("/nonexistent/facturi.csv")).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFile(_)));
    }
}
