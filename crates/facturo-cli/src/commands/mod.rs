//! Subcommands.

pub mod batch;
pub mod config;
pub mod generate;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use facturo_core::models::config::FacturoConfig;
use facturo_core::LayoutVariant;

/// Spreadsheet extensions accepted as input.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xlsm", "xls"];

/// Layout variant as given on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VariantArg {
    /// Multi-charge invoice (23-column sheet)
    Itemized,
    /// Summary invoice (10-column sheet)
    Summary,
    /// Summary invoice with the total in words and a signature line
    SummaryWithWords,
}

impl From<VariantArg> for LayoutVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Itemized => LayoutVariant::Itemized,
            VariantArg::Summary => LayoutVariant::Summary,
            VariantArg::SummaryWithWords => LayoutVariant::SummaryWithWords,
        }
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facturo")
        .join("config.json")
}

/// The config file in effect: `--config` if given, else the default location.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration; an explicit path must exist, the default may not.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturoConfig> {
    if let Some(path) = config_path {
        return FacturoConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        Ok(FacturoConfig::from_file(&path)?)
    } else {
        Ok(FacturoConfig::default())
    }
}

/// Whether a path has a spreadsheet extension.
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
