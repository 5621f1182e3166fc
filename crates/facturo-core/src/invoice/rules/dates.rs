//! Date formatting for invoice fields.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::FormatError;
use crate::sheet::Cell;

/// Pattern of date strings exported by spreadsheets as text.
const SOURCE_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Pattern dates are printed with on invoices.
const INVOICE_PATTERN: &str = "%d-%m-%Y";

/// Parse a cell into a calendar date.
pub fn parse_date(cell: &Cell) -> Result<NaiveDate, FormatError> {
    match cell {
        Cell::DateTime(dt) => Ok(dt.date()),
        Cell::Text(s) => NaiveDateTime::parse_from_str(s, SOURCE_PATTERN)
            .map(|dt| dt.date())
            .map_err(|_| FormatError::NotADate(s.clone())),
        _ => Err(FormatError::NotADate(cell.display())),
    }
}

/// Format a cell as `DD-MM-YYYY`.
///
/// Values that are not dates are returned unchanged.
pub fn format_date(cell: &Cell) -> String {
    match parse_date(cell) {
        Ok(date) => date.format(INVOICE_PATTERN).to_string(),
        Err(_) => cell.display(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_native_date() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert_eq!(format_date(&Cell::DateTime(dt)), "05-01-2024");
    }

    #[test]
    fn test_format_date_string() {
        assert_eq!(format_date(&Cell::from("2023-12-31 00:00:00")), "31-12-2023");
    }

    #[test]
    fn test_unparseable_date_is_returned_unchanged() {
        assert_eq!(format_date(&Cell::from("31/12/2023")), "31/12/2023");
        assert_eq!(format_date(&Cell::from("2023-12-31")), "2023-12-31");
        assert_eq!(format_date(&Cell::Number(45000.0)), "45000");
    }

    #[test]
    fn test_parse_date_error() {
        assert_eq!(
            parse_date(&Cell::from("demain")),
            Err(FormatError::NotADate("demain".to_string()))
        );
    }
}
