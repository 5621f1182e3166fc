//! Batch generation: one spreadsheet in, one PDF per valid row out.

mod naming;
mod sink;

pub use naming::{sanitize, FileNamer};
pub use sink::{DirectorySink, DocumentSink, MemorySink};

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FacturoError, RenderError, Result, RowError};
use crate::invoice::{RowExtractor, SchemaResolver, SkippedRow};
use crate::models::config::FacturoConfig;
use crate::models::record::InvoiceRecord;
use crate::pdf::PdfWriter;
use crate::render::InvoiceRenderer;
use crate::sheet::Sheet;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A row that did not produce a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// 1-based spreadsheet row number.
    pub row: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Produced file names, in row order.
    pub documents: Vec<String>,
    /// Rows that were rendered but failed, plus incomplete rows under the
    /// strict completeness policy.
    pub failures: Vec<RowFailure>,
    /// Rows dropped for empty mapped cells.
    pub skipped: Vec<SkippedRow>,
    /// Data rows read, header excluded.
    pub rows_seen: usize,
}

impl BatchSummary {
    /// Number of documents produced.
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    /// Success message shown to the user.
    pub fn message(&self) -> String {
        format!("{} factures générées avec succès", self.count())
    }
}

/// Drives schema resolution, extraction, rendering, and output for a batch.
pub struct InvoicePipeline<S> {
    config: FacturoConfig,
    resolver: SchemaResolver,
    renderer: InvoiceRenderer,
    writer: PdfWriter,
    sink: S,
    timestamp: Option<NaiveDateTime>,
}

impl<S: DocumentSink> InvoicePipeline<S> {
    /// Create a pipeline writing to `sink`.
    pub fn new(config: FacturoConfig, sink: S) -> Self {
        let resolver = SchemaResolver::new(config.layout.variant.schema(), config.schema.matching);
        let renderer = InvoiceRenderer::from_config(&config);

        Self {
            config,
            resolver,
            renderer,
            writer: PdfWriter::new(),
            sink,
            timestamp: None,
        }
    }

    /// Use a fixed generation time for file name suffixes.
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn config(&self) -> &FacturoConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run a batch over an `.xlsx` workbook held in memory.
    pub fn run_bytes(&mut self, bytes: &[u8]) -> Result<BatchSummary> {
        let sheet = Sheet::from_xlsx_bytes(bytes)?;
        self.run(&sheet)
    }

    /// Run a batch over an `.xlsx` workbook on disk.
    pub fn run_path(&mut self, path: &Path) -> Result<BatchSummary> {
        let sheet = Sheet::from_xlsx_path(path)?;
        self.run(&sheet)
    }

    /// Run a batch over a sheet.
    ///
    /// Only a header mismatch or an empty result fails the batch; every
    /// per-row problem is logged with its row number and recorded in the
    /// summary.
    pub fn run(&mut self, sheet: &Sheet) -> Result<BatchSummary> {
        let mapping = self.resolver.resolve_sheet(sheet).inspect_err(|e| {
            warn!("Header rejected: {}", e);
        })?;

        let stamp = self.config.output.timestamp_suffix.then(|| {
            self.timestamp
                .unwrap_or_else(|| Local::now().naive_local())
                .format(TIMESTAMP_FORMAT)
                .to_string()
        });
        let mut namer = FileNamer::new(self.config.output.file_prefix.as_str(), stamp);

        let mut summary = BatchSummary {
            rows_seen: sheet.len().saturating_sub(1),
            ..Default::default()
        };

        let mut extractor = RowExtractor::new(
            &mapping,
            sheet.data_rows(),
            self.config.extraction.completeness,
        );

        for item in extractor.by_ref() {
            let outcome = match item {
                Ok(record) => self.produce(&record, &mut namer).map_err(|e| (record.row(), e)),
                Err(skipped) => Err((
                    skipped.row,
                    RowError::Incomplete {
                        missing: skipped.missing,
                    },
                )),
            };

            match outcome {
                Ok(name) => summary.documents.push(name),
                Err((row, e)) => {
                    warn!("Row {} skipped: {}", row, e);
                    summary.failures.push(RowFailure {
                        row,
                        reason: e.to_string(),
                    });
                }
            }
        }
        summary.skipped = extractor.into_skipped();

        info!(
            "{} documents from {} rows ({} failed, {} incomplete)",
            summary.count(),
            summary.rows_seen,
            summary.failures.len(),
            summary.skipped.len()
        );

        if summary.documents.is_empty() {
            return Err(FacturoError::EmptyResult);
        }
        Ok(summary)
    }

    fn produce(
        &mut self,
        record: &InvoiceRecord,
        namer: &mut FileNamer,
    ) -> std::result::Result<String, RowError> {
        let document = self.renderer.render(record)?;
        let bytes = self.writer.write(&document)?;

        let name = namer.name_for(&record.invoice_number());
        self.sink
            .write(&name, &bytes)
            .map_err(RenderError::Io)?;

        debug!("Row {} -> {}", record.row(), name);
        Ok(name)
    }
}

/// Generate invoices from workbook bytes into the configured output folder.
pub fn generate_invoices(bytes: &[u8], config: &FacturoConfig) -> Result<BatchSummary> {
    let sink = DirectorySink::new(config.output.directory.clone());
    InvoicePipeline::new(config.clone(), sink).run_bytes(bytes)
}
