//! Spreadsheet input: a plain grid of typed cells read from a workbook.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::SheetError;

/// Result type for spreadsheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// Text, kept verbatim.
    Text(String),
    /// Any numeric cell (Excel stores integers as floats too).
    Number(f64),
    /// A date or date-time cell.
    DateTime(NaiveDateTime),
    /// A boolean cell.
    Bool(bool),
}

impl Cell {
    /// Whether the cell counts as absent data: no value or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Plain string rendering of the raw value.
    ///
    /// Integral numbers print without a fractional part so that day counts
    /// and invoice numbers read naturally.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(dt: NaiveDateTime) -> Self {
        Cell::DateTime(dt)
    }
}

/// A worksheet as rows of cells. Row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Create a sheet from raw rows.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Read the first worksheet of an Excel workbook held in memory.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| SheetError::Open(e.to_string()))?;

        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(SheetError::NoWorksheet)?;

        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| SheetError::Worksheet {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        let sheet = Self::from_range(&range);
        debug!("Read worksheet {:?}: {} rows", name, sheet.rows.len());
        Ok(sheet)
    }

    /// Read the first worksheet of an Excel workbook on disk.
    pub fn from_xlsx_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| SheetError::Open(format!("{}: {}", path.display(), e)))?;
        Self::from_xlsx_bytes(&bytes)
    }

    /// Build the grid from a calamine range.
    ///
    /// A range starts at its first used cell; leading empty rows and columns
    /// are restored so that row 0 is always the sheet's first row.
    fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset as usize];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset as usize];
            cells.extend(row.iter().map(convert_cell));
            rows.push(cells);
        }

        Self { rows }
    }

    /// The header row, if the sheet has any rows.
    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Header cells as trimmed strings.
    pub fn header_names(&self) -> Vec<String> {
        self.header()
            .map(|cells| cells.iter().map(|c| c.display().trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Data rows paired with their 1-based spreadsheet row number.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }

    /// Number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sheet has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<Cell>>> for Sheet {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::new(rows)
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#ERR:{:?}", e)),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Empty.display(), "");
        assert_eq!(Cell::Number(5.0).display(), "5");
        assert_eq!(Cell::Number(1234.5).display(), "1234.5");
        assert_eq!(Cell::from("FA-001").display(), "FA-001");

        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(dt).display(), "2024-03-01 10:30:00");
    }

    #[test]
    fn test_cell_is_empty() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::from("").is_empty());
        assert!(!Cell::from(" ").is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }

    #[test]
    fn test_data_rows_are_numbered_from_two() {
        let sheet = Sheet::new(vec![
            vec![Cell::from("A")],
            vec![Cell::from("x")],
            vec![Cell::from("y")],
        ]);

        let numbers: Vec<usize> = sheet.data_rows().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(sheet.header_names(), vec!["A".to_string()]);
    }

    #[test]
    fn test_from_xlsx_bytes() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

        worksheet.write_string(0, 0, " Facture Numero ").unwrap();
        worksheet.write_string(0, 1, "Date de facture").unwrap();
        worksheet.write_string(0, 2, "Nombre de jours").unwrap();
        worksheet.write_string(1, 0, "F-100").unwrap();
        let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        worksheet
            .write_datetime_with_format(1, 1, &date, &date_format)
            .unwrap();
        worksheet.write_number(1, 2, 3.0).unwrap();

        let bytes = workbook.save_to_buffer().unwrap();
        let sheet = Sheet::from_xlsx_bytes(&bytes).unwrap();

        assert_eq!(
            sheet.header_names(),
            vec!["Facture Numero", "Date de facture", "Nombre de jours"]
        );

        let (row_number, row) = sheet.data_rows().next().unwrap();
        assert_eq!(row_number, 2);
        assert_eq!(row[0], Cell::from("F-100"));
        assert_eq!(
            row[1],
            Cell::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 15)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(row[2], Cell::Number(3.0));
    }

    #[test]
    fn test_from_xlsx_bytes_rejects_garbage() {
        let result = Sheet::from_xlsx_bytes(b"not a workbook");
        assert!(matches!(result, Err(SheetError::Open(_))));
    }
}
