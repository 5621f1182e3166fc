//! Generate command - one spreadsheet in, one PDF per valid row out.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use facturo_core::models::config::FacturoConfig;
use facturo_core::{BatchSummary, CompletenessPolicy, DirectorySink, InvoicePipeline, MatchPolicy};

use super::{is_spreadsheet, load_config, VariantArg};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input spreadsheet (.xlsx)
    #[arg(required = true)]
    input: PathBuf,

    /// Output directory (default: from config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Layout variant (default: from config)
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Require headers to match the schema exactly and in order
    #[arg(long)]
    strict_headers: bool,

    /// Report incomplete rows as failures
    #[arg(long)]
    strict_rows: bool,

    /// Do not append a timestamp to file names
    #[arg(long)]
    no_timestamp: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// Machine-readable result, mirroring an upload response.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn success(summary: &BatchSummary) -> Self {
        Self {
            success: true,
            files: summary.documents.clone(),
            message: Some(summary.message()),
            error: None,
        }
    }

    fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            message: None,
            error: Some(error.to_string()),
        }
    }
}

pub fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = apply_overrides(load_config(config_path)?, &args);

    let result = generate(&args, &config);
    debug!("Total processing time: {:?}", start.elapsed());

    if args.json {
        let response = match &result {
            Ok(summary) => GenerateResponse::success(summary),
            Err(e) => GenerateResponse::failure(e),
        };
        println!("{}", serde_json::to_string(&response)?);
        if !response.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    let summary = result?;
    println!("{} {}", style("✓").green(), summary.message());
    for name in &summary.documents {
        println!("  {}", config.output.directory.join(name).display());
    }

    if !summary.failures.is_empty() {
        println!();
        println!("{}", style("Rows not generated:").yellow());
        for failure in &summary.failures {
            println!("  - row {}: {}", failure.row, failure.reason);
        }
    }
    if !summary.skipped.is_empty() {
        info!("{} incomplete rows skipped", summary.skipped.len());
    }

    Ok(())
}

/// Fold command-line flags into the loaded configuration.
pub fn apply_overrides(mut config: FacturoConfig, args: &GenerateArgs) -> FacturoConfig {
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(variant) = args.variant {
        config.layout.variant = variant.into();
    }
    if args.strict_headers {
        config.schema.matching = MatchPolicy::Strict;
    }
    if args.strict_rows {
        config.extraction.completeness = CompletenessPolicy::Strict;
    }
    if args.no_timestamp {
        config.output.timestamp_suffix = false;
    }
    config
}

fn generate(args: &GenerateArgs, config: &FacturoConfig) -> anyhow::Result<BatchSummary> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_spreadsheet(&args.input) {
        anyhow::bail!("Type de fichier non autorisé");
    }

    info!(
        "Generating {} invoices from {}",
        config.layout.variant.as_str(),
        args.input.display()
    );

    let sink = DirectorySink::new(config.output.directory.clone());
    let mut pipeline = InvoicePipeline::new(config.clone(), sink);
    Ok(pipeline.run_path(&args.input)?)
}
