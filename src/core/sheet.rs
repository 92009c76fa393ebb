//! In-memory cell grid of a single worksheet.

use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula error such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Short type name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Error(_) => "error",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Error(e) => f.write_str(e),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

const EMPTY: Cell = Cell::Empty;

/// Read-only grid of a worksheet, addressed by 1-based row and 0-based column.
///
/// Row 1 is the header; data rows start at 2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from rows, the first being the header row.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Set a cell, growing the grid as needed.
    ///
    /// Rows are 1-based; writing to row 0 is ignored, matching
    /// [`cell`](Self::cell) which reads it as empty.
    pub fn set(&mut self, row: usize, column: usize, cell: Cell) {
        if row == 0 {
            return;
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() <= column {
            cells.resize(column + 1, Cell::Empty);
        }
        cells[column] = cell;
    }

    /// Cell at `row` (1-based) and `column` (0-based); `Empty` outside the grid.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        row.checked_sub(1)
            .and_then(|r| self.rows.get(r))
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY)
    }

    /// Number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 1-based numbers of the data rows (everything after the header).
    pub fn data_rows(&self) -> std::ops::RangeInclusive<usize> {
        2..=self.rows.len()
    }
}

/// Spreadsheet column letter for a 0-based index (0 → "A", 26 → "AA").
pub fn column_letter(column: usize) -> String {
    let mut n = column + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1-style reference for a cell.
pub fn cell_ref(row: usize, column: usize) -> String {
    format!("{}{row}", column_letter(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(3), "D");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(cell_ref(1, 2), "C1");
    }

    #[test]
    fn out_of_range_reads_empty() {
        let mut sheet = Sheet::new();
        sheet.set(3, 4, Cell::Number(1.5));
        assert_eq!(sheet.cell(3, 4), &Cell::Number(1.5));
        assert_eq!(sheet.cell(3, 9), &Cell::Empty);
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
        assert_eq!(sheet.cell(40, 0), &Cell::Empty);
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.data_rows(), 2..=3);
    }

    #[test]
    fn row_zero_write_is_ignored() {
        let mut sheet = Sheet::new();
        sheet.set(0, 2, Cell::from("tert"));
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.cell(0, 2), &Cell::Empty);
        assert_eq!(sheet.cell(1, 2), &Cell::Empty);
    }

    #[test]
    fn whitespace_text_is_empty() {
        assert!(Cell::from("   ").is_empty());
        assert!(!Cell::from("x").is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }
}
