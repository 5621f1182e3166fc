//! Batch command for multiple spreadsheets.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use facturo_core::models::config::FacturoConfig;
use facturo_core::{BatchSummary, DirectorySink, InvoicePipeline, LayoutVariant};

use super::{is_spreadsheet, load_config, VariantArg};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory; each spreadsheet gets a subfolder
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Layout variant (default: from config)
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single spreadsheet.
struct SheetResult {
    path: PathBuf,
    summary: Option<BatchSummary>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(variant) = args.variant {
        config.layout.variant = LayoutVariant::from(variant);
    }
    let output_root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.directory.clone());

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_spreadsheet(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} spreadsheets to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &output_root, &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(summary) => {
                debug!("{}: {}", path.display(), summary.message());
                results.push(SheetResult {
                    path,
                    summary: Some(summary),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(SheetResult {
                        path,
                        summary: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        std::fs::create_dir_all(&output_root)?;
        let summary_path = output_root.join("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful: Vec<_> = results.iter().filter(|r| r.summary.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let documents: usize = successful
        .iter()
        .filter_map(|r| r.summary.as_ref())
        .map(BatchSummary::count)
        .sum();

    println!();
    println!(
        "{} Processed {} spreadsheets in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} invoices",
        style(successful.len()).green(),
        style(failed.len()).red(),
        documents
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    output_root: &Path,
    config: &FacturoConfig,
) -> anyhow::Result<BatchSummary> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("factures");
    let sink = DirectorySink::new(output_root.join(facturo_core::pipeline::sanitize(stem)));

    let mut pipeline = InvoicePipeline::new(config.clone(), sink);
    Ok(pipeline.run_path(path)?)
}

fn write_summary(path: &Path, results: &[SheetResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "documents",
        "failed_rows",
        "skipped_rows",
        "processing_time_ms",
        "generated_at",
        "error",
    ])?;

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(summary) = &result.summary {
            wtr.write_record([
                filename,
                "success",
                &summary.count().to_string(),
                &summary.failures.len().to_string(),
                &summary.skipped.len().to_string(),
                &result.processing_time_ms.to_string(),
                &generated_at,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "0",
                "",
                "",
                &result.processing_time_ms.to_string(),
                &generated_at,
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
