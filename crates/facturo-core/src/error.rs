//! Error types for the facturo-core library.

use thiserror::Error;

/// Main error type for the facturo library.
///
/// Only batch-fatal conditions reach this type from the pipeline: a header
/// row that cannot be resolved, a spreadsheet that cannot be read, or a batch
/// that produced nothing. Per-row problems are absorbed as [`RowError`]s.
#[derive(Error, Debug)]
pub enum FacturoError {
    /// The header row does not match the expected schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The spreadsheet could not be read.
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// The batch completed without producing a single document.
    #[error("Aucune facture n'a pu être générée. Vérifiez le format de vos données.")]
    EmptyResult,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while matching a header row against an expected schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// One or more canonical fields have no matching header.
    #[error("Colonnes manquantes dans le fichier Excel: {}", missing.join(", "))]
    MissingColumns {
        /// Unmatched canonical field names, in schema order.
        missing: Vec<String>,
    },

    /// Strict matching found headers past the end of the schema.
    #[error("Colonnes inattendues dans le fichier Excel: {}", extra.join(", "))]
    UnexpectedColumns { extra: Vec<String> },

    /// The sheet has no header row at all.
    #[error("Le fichier Excel ne contient aucune ligne d'en-tête")]
    EmptyHeader,
}

impl SchemaError {
    /// Canonical fields reported as missing, if any.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            SchemaError::MissingColumns { missing } => missing,
            _ => &[],
        }
    }
}

/// Errors raised while reading a spreadsheet.
#[derive(Error, Debug)]
pub enum SheetError {
    /// The workbook could not be opened or parsed.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The workbook contains no worksheet.
    #[error("workbook has no worksheets")]
    NoWorksheet,

    /// A worksheet could not be read.
    #[error("failed to read worksheet {name}: {reason}")]
    Worksheet { name: String, reason: String },
}

/// A value that could not be coerced to its semantic type.
///
/// Formatting functions never surface this to callers; it is used by the
/// strict parsers that back them and by the renderer when arithmetic is
/// required.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The value is not a number.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// The value is not a date.
    #[error("not a date: {0:?}")]
    NotADate(String),
}

/// Errors raised while laying out or serializing one invoice.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A field needed for arithmetic or a charge test is not numeric.
    #[error("invalid value for {field}: {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: FormatError,
    },

    /// The record lacks a field the layout needs.
    #[error("missing field: {0}")]
    MissingField(String),

    /// PDF serialization failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The document could not be written to its destination.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single row did not produce a document.
#[derive(Error, Debug)]
pub enum RowError {
    /// One or more mapped cells are empty.
    #[error("incomplete row, empty fields: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },

    /// Rendering failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for the facturo library.
pub type Result<T> = std::result::Result<T, FacturoError>;
