//! Core library for vehicle-rental invoice generation.
//!
//! This crate provides:
//! - Spreadsheet reading (first worksheet of an `.xlsx` workbook)
//! - Header resolution against the itemized and summary schemas
//! - Row extraction with a skip-on-incomplete policy
//! - French formatting of dates, amounts, and amounts in words
//! - Fixed-geometry A4 invoice layouts and PDF output
//! - A batch pipeline producing one document per valid row

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod sheet;

pub use error::{FacturoError, FormatError, RenderError, Result, RowError, SchemaError, SheetError};
pub use invoice::{
    AmountFallback, ColumnMapping, CompletenessPolicy, FieldFormatter, MatchPolicy, RowExtractor,
    SchemaResolver, SkippedRow,
};
pub use models::{ExpectedSchema, FacturoConfig, InvoiceRecord, LayoutVariant};
pub use pdf::PdfWriter;
pub use pipeline::{
    generate_invoices, BatchSummary, DirectorySink, DocumentSink, InvoicePipeline, MemorySink,
    RowFailure,
};
pub use render::{Document, DrawOp, InvoiceRenderer};
pub use sheet::{Cell, Sheet};
