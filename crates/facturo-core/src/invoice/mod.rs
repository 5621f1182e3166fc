//! Spreadsheet-to-record stage: schema resolution, row extraction, and field
//! formatting rules.

pub mod extractor;
pub mod rules;
pub mod schema;

pub use extractor::{extract_record, CompletenessPolicy, RowExtractor, SkippedRow};
pub use rules::{AmountFallback, FieldFormatter};
pub use schema::{ColumnMapping, MatchPolicy, SchemaResolver};
