//! Row extraction with a skip-on-incomplete policy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::record::InvoiceRecord;
use crate::sheet::Cell;

use super::schema::ColumnMapping;

/// What happens to rows with empty mapped cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessPolicy {
    /// Skip silently; the row is only visible in the skip diagnostics.
    #[default]
    Lenient,
    /// Skip and report the row as an "incomplete" failure.
    Strict,
}

/// A row dropped because mapped cells were empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based spreadsheet row number.
    pub row: usize,
    /// Canonical fields whose cells were empty, in schema order.
    pub missing: Vec<String>,
}

/// Read one row through the mapping.
///
/// Returns the names of every empty mapped field when the row is incomplete.
pub fn extract_record(
    mapping: &ColumnMapping,
    row: usize,
    cells: &[Cell],
) -> Result<InvoiceRecord, Vec<String>> {
    let mut values = Vec::with_capacity(mapping.len());
    let mut missing = Vec::new();

    for (field, idx) in mapping.iter() {
        match cells.get(idx) {
            Some(cell) if !cell.is_empty() => values.push((field, cell.clone())),
            _ => missing.push(field.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(InvoiceRecord::new(row, values))
    } else {
        Err(missing)
    }
}

/// Lazily turns numbered data rows into records.
///
/// Consumes its row source, so each row is seen once. Under the lenient
/// policy incomplete rows never surface from `next`; under the strict policy
/// they come out as `Err`. Either way they are collected in [`skipped`].
///
/// [`skipped`]: RowExtractor::skipped
pub struct RowExtractor<'a, I> {
    mapping: &'a ColumnMapping,
    rows: I,
    policy: CompletenessPolicy,
    skipped: Vec<SkippedRow>,
}

impl<'a, 'r, I> RowExtractor<'a, I>
where
    I: Iterator<Item = (usize, &'r [Cell])>,
{
    pub fn new(mapping: &'a ColumnMapping, rows: I, policy: CompletenessPolicy) -> Self {
        Self {
            mapping,
            rows,
            policy,
            skipped: Vec::new(),
        }
    }

    /// Rows skipped so far.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Take the skip diagnostics, ending extraction.
    pub fn into_skipped(self) -> Vec<SkippedRow> {
        self.skipped
    }
}

impl<'a, 'r, I> Iterator for RowExtractor<'a, I>
where
    I: Iterator<Item = (usize, &'r [Cell])>,
{
    type Item = Result<InvoiceRecord, SkippedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (row, cells) = self.rows.next()?;

            match extract_record(self.mapping, row, cells) {
                Ok(record) => return Some(Ok(record)),
                Err(missing) => {
                    debug!("Row {} skipped, empty fields: {}", row, missing.join(", "));
                    let skipped = SkippedRow { row, missing };
                    self.skipped.push(skipped.clone());

                    if self.policy == CompletenessPolicy::Strict {
                        return Some(Err(skipped));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::schema::{MatchPolicy, SchemaResolver};
    use crate::models::schema::{fields, ExpectedSchema};
    use crate::sheet::Sheet;
    use pretty_assertions::assert_eq;

    fn summary_sheet(rows: Vec<Vec<Cell>>) -> Sheet {
        let mut all = vec![ExpectedSchema::summary()
            .fields()
            .iter()
            .map(|f| Cell::from(*f))
            .collect::<Vec<_>>()];
        all.extend(rows);
        Sheet::new(all)
    }

    fn full_row(number: &str) -> Vec<Cell> {
        vec![
            Cell::from(number),
            Cell::from("2024-02-01 00:00:00"),
            Cell::from("ACME SARL"),
            Cell::from("2024-01-20 09:00:00"),
            Cell::from("2024-01-25 09:00:00"),
            Cell::from("Dacia Logan"),
            Cell::from("12345-A-6"),
            Cell::Number(5.0),
            Cell::Number(1000.0),
            Cell::Number(1200.0),
        ]
    }

    fn mapping_for(sheet: &Sheet) -> ColumnMapping {
        SchemaResolver::new(ExpectedSchema::summary(), MatchPolicy::Tolerant)
            .resolve_sheet(sheet)
            .unwrap()
    }

    #[test]
    fn test_complete_row_keeps_original_values() {
        let row = full_row("F-1");
        let sheet = summary_sheet(vec![row.clone()]);
        let mapping = mapping_for(&sheet);

        let records: Vec<_> =
            RowExtractor::new(&mapping, sheet.data_rows(), CompletenessPolicy::Lenient).collect();
        assert_eq!(records.len(), 1);

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.row(), 2);
        assert_eq!(record.len(), 10);
        for (field, cell) in ExpectedSchema::summary().fields().iter().zip(row.iter()) {
            assert_eq!(record.get(field), Some(cell));
        }
    }

    #[test]
    fn test_lenient_skips_incomplete_rows_silently() {
        let mut incomplete = full_row("F-2");
        incomplete[6] = Cell::Empty;
        incomplete[2] = Cell::from("");

        let sheet = summary_sheet(vec![full_row("F-1"), incomplete, full_row("F-3")]);
        let mapping = mapping_for(&sheet);

        let mut extractor =
            RowExtractor::new(&mapping, sheet.data_rows(), CompletenessPolicy::Lenient);
        let numbers: Vec<String> = extractor
            .by_ref()
            .map(|r| r.unwrap().invoice_number())
            .collect();

        assert_eq!(numbers, vec!["F-1", "F-3"]);
        assert_eq!(
            extractor.into_skipped(),
            vec![SkippedRow {
                row: 3,
                missing: vec![fields::CLIENT.to_string(), fields::PLATE.to_string()],
            }]
        );
    }

    #[test]
    fn test_strict_reports_incomplete_rows() {
        let mut short = full_row("F-2");
        short.truncate(8);

        let sheet = summary_sheet(vec![short, full_row("F-3")]);
        let mapping = mapping_for(&sheet);

        let results: Vec<_> =
            RowExtractor::new(&mapping, sheet.data_rows(), CompletenessPolicy::Strict).collect();
        assert_eq!(results.len(), 2);

        let skipped = results[0].as_ref().unwrap_err();
        assert_eq!(skipped.row, 2);
        assert_eq!(
            skipped.missing,
            vec![fields::TOTAL_HT.to_string(), fields::TOTAL_TTC.to_string()]
        );
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_whitespace_cell_is_not_empty() {
        let mut row = full_row("F-4");
        row[5] = Cell::from(" ");
        let sheet = summary_sheet(vec![row]);
        let mapping = mapping_for(&sheet);

        assert!(extract_record(&mapping, 2, sheet.data_rows().next().unwrap().1).is_ok());
    }
}
