//! A validated spreadsheet row keyed by canonical field name.

use crate::error::RenderError;
use crate::sheet::Cell;

use super::schema::fields;

/// One complete data row: every canonical field present and non-empty.
///
/// Values are the raw cells, untouched; formatting happens at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    row: usize,
    values: Vec<(&'static str, Cell)>,
}

impl InvoiceRecord {
    /// Create a record for the given 1-based spreadsheet row.
    pub fn new(row: usize, values: Vec<(&'static str, Cell)>) -> Self {
        Self { row, values }
    }

    /// Spreadsheet row the record came from.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Look up a field's raw value.
    pub fn get(&self, field: &str) -> Option<&Cell> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, cell)| cell)
    }

    /// Look up a field the layout cannot do without.
    pub fn require(&self, field: &str) -> Result<&Cell, RenderError> {
        self.get(field)
            .ok_or_else(|| RenderError::MissingField(field.to_string()))
    }

    /// Field display string, or empty when absent.
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(Cell::display).unwrap_or_default()
    }

    /// Trimmed invoice number.
    pub fn invoice_number(&self) -> String {
        self.text(fields::INVOICE_NUMBER).trim().to_string()
    }

    /// Fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Cell)> {
        self.values.iter().map(|(name, cell)| (*name, cell))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lookup() {
        let record = InvoiceRecord::new(
            2,
            vec![
                (fields::INVOICE_NUMBER, Cell::from(" F-7 ")),
                (fields::DAYS, Cell::Number(4.0)),
            ],
        );

        assert_eq!(record.row(), 2);
        assert_eq!(record.invoice_number(), "F-7");
        assert_eq!(record.text(fields::DAYS), "4");
        assert!(record.get(fields::CLIENT).is_none());
        assert!(matches!(
            record.require(fields::CLIENT),
            Err(RenderError::MissingField(_))
        ));
    }
}
