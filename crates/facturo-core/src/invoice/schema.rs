//! Header row resolution against an expected schema.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SchemaError;
use crate::models::schema::ExpectedSchema;
use crate::sheet::Sheet;

/// How header cells are matched to canonical fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Headers must equal the schema verbatim, in order.
    Strict,
    /// Headers match by case-insensitive name, in any order.
    #[default]
    Tolerant,
}

/// Canonical field name → source column index, covering the whole schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: Vec<(&'static str, usize)>,
}

impl ColumnMapping {
    /// Column index of a canonical field.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, idx)| *idx)
    }

    /// Entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Matches a header row against an [`ExpectedSchema`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver {
    schema: ExpectedSchema,
    policy: MatchPolicy,
}

impl SchemaResolver {
    pub fn new(schema: ExpectedSchema, policy: MatchPolicy) -> Self {
        Self { schema, policy }
    }

    pub fn schema(&self) -> ExpectedSchema {
        self.schema
    }

    /// Resolve the header row of a sheet.
    pub fn resolve_sheet(&self, sheet: &Sheet) -> Result<ColumnMapping, SchemaError> {
        if sheet.header().is_none() {
            return Err(SchemaError::EmptyHeader);
        }
        self.resolve(&sheet.header_names())
    }

    /// Resolve trimmed header names into a complete mapping.
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnMapping, SchemaError> {
        let mapping = match self.policy {
            MatchPolicy::Strict => self.resolve_strict(headers)?,
            MatchPolicy::Tolerant => self.resolve_tolerant(headers)?,
        };

        debug!(
            "Resolved {} columns for {} schema ({:?} matching)",
            mapping.len(),
            self.schema.name(),
            self.policy
        );
        Ok(mapping)
    }

    fn resolve_tolerant(&self, headers: &[String]) -> Result<ColumnMapping, SchemaError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let mut entries = Vec::with_capacity(self.schema.len());
        let mut missing = Vec::new();

        for field in self.schema.fields() {
            let wanted = field.to_lowercase();
            match lowered.iter().position(|h| *h == wanted) {
                Some(idx) => entries.push((*field, idx)),
                None => missing.push(field.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }
        Ok(ColumnMapping { entries })
    }

    fn resolve_strict(&self, headers: &[String]) -> Result<ColumnMapping, SchemaError> {
        let used = headers
            .iter()
            .rposition(|h| !h.is_empty())
            .map_or(0, |last| last + 1);
        let headers = &headers[..used];

        let missing: Vec<String> = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(idx, field)| headers.get(*idx).map(String::as_str) != Some(**field))
            .map(|(_, field)| field.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }

        if headers.len() > self.schema.len() {
            let extra = headers[self.schema.len()..].to_vec();
            return Err(SchemaError::UnexpectedColumns { extra });
        }

        let entries = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| (*field, idx))
            .collect();
        Ok(ColumnMapping { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::fields;
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn tolerant(schema: ExpectedSchema) -> SchemaResolver {
        SchemaResolver::new(schema, MatchPolicy::Tolerant)
    }

    #[test]
    fn test_tolerant_matches_any_order_and_case() {
        let schema = ExpectedSchema::summary();
        let base: Vec<&str> = schema.fields().to_vec();

        let mut reversed = base.clone();
        reversed.reverse();
        let mut rotated = base.clone();
        rotated.rotate_left(3);
        let shouted: Vec<String> = base.iter().map(|f| f.to_uppercase()).collect();
        let mut mixed: Vec<String> = rotated.iter().map(|f| f.to_lowercase()).collect();
        mixed.swap(0, 9);

        for candidate in [
            headers(&base),
            headers(&reversed),
            headers(&rotated),
            shouted,
            mixed,
        ] {
            let mapping = tolerant(schema).resolve(&candidate).unwrap();
            assert_eq!(mapping.len(), schema.len());

            let mut indices: Vec<usize> = mapping.iter().map(|(_, idx)| idx).collect();
            indices.sort_unstable();
            indices.dedup();
            assert_eq!(indices.len(), schema.len());

            for (field, idx) in mapping.iter() {
                assert_eq!(candidate[idx].to_lowercase(), field.to_lowercase());
            }
        }
    }

    #[test]
    fn test_tolerant_first_match_wins() {
        let mut names: Vec<&str> = ExpectedSchema::summary().fields().to_vec();
        names.push("client");

        let mapping = tolerant(ExpectedSchema::summary())
            .resolve(&headers(&names))
            .unwrap();
        assert_eq!(mapping.index_of(fields::CLIENT), Some(2));
    }

    #[test]
    fn test_missing_columns_are_named() {
        let names: Vec<&str> = ExpectedSchema::itemized()
            .fields()
            .iter()
            .copied()
            .filter(|f| *f != fields::CLIENT && *f != fields::GPS_HT)
            .collect();

        let err = tolerant(ExpectedSchema::itemized())
            .resolve(&headers(&names))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                missing: vec![fields::CLIENT.to_string(), fields::GPS_HT.to_string()]
            }
        );
    }

    #[test]
    fn test_strict_accepts_exact_header() {
        let schema = ExpectedSchema::summary();
        let mut names = headers(schema.fields());
        names.push(String::new());

        let mapping = SchemaResolver::new(schema, MatchPolicy::Strict)
            .resolve(&names)
            .unwrap();
        assert_eq!(mapping.index_of(fields::TOTAL_TTC), Some(9));
    }

    #[test]
    fn test_strict_rejects_reordered_header() {
        let schema = ExpectedSchema::summary();
        let mut names = headers(schema.fields());
        names.swap(0, 1);

        let err = SchemaResolver::new(schema, MatchPolicy::Strict)
            .resolve(&names)
            .unwrap_err();
        assert_eq!(
            err.missing_fields(),
            [fields::INVOICE_NUMBER.to_string(), fields::INVOICE_DATE.to_string()]
        );
    }

    #[test]
    fn test_strict_rejects_case_difference_and_extra_columns() {
        let schema = ExpectedSchema::summary();
        let mut names = headers(schema.fields());
        names[2] = "CLIENT".to_string();
        assert!(SchemaResolver::new(schema, MatchPolicy::Strict).resolve(&names).is_err());

        let mut names = headers(schema.fields());
        names.push("Remarque".to_string());
        let err = SchemaResolver::new(schema, MatchPolicy::Strict)
            .resolve(&names)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnexpectedColumns {
                extra: vec!["Remarque".to_string()]
            }
        );
    }

    #[test]
    fn test_empty_sheet_has_no_header() {
        let err = tolerant(ExpectedSchema::summary())
            .resolve_sheet(&Sheet::default())
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyHeader);
    }
}
