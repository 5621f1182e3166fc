//! Configuration structures for the invoice pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::invoice::extractor::CompletenessPolicy;
use crate::invoice::rules::AmountFallback;
use crate::invoice::schema::MatchPolicy;
use crate::models::schema::LayoutVariant;

/// Main configuration for the facturo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturoConfig {
    /// Document layout configuration.
    pub layout: LayoutConfig,

    /// Header matching configuration.
    pub schema: SchemaConfig,

    /// Row extraction configuration.
    pub extraction: ExtractionConfig,

    /// Value formatting configuration.
    pub formatting: FormattingConfig,

    /// Output naming configuration.
    pub output: OutputConfig,
}

/// Layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Document template; also selects the expected schema.
    pub variant: LayoutVariant,

    /// Centered footer lines of the itemized layout, first line at the bottom.
    pub footer_lines: Vec<String>,

    /// Currency label appended to amounts.
    pub currency: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            variant: LayoutVariant::default(),
            footer_lines: vec![
                "PREPAID CAR RENTAL S.A.R.L A.U, 7 RUE MOHAMED DIOURI ETG 3 N°149, CASABLANCA. Taxe Professionnelle : 33066321 - CNSS : 4052594 - ICE : 0000 349 590 00014.".to_string(),
                "TEL : (+212) 5 22 54 00 22. Capital : 7 000 000 DHS - RC : 309011 - IF : 15186686.".to_string(),
            ],
            currency: "MAD".to_string(),
        }
    }
}

/// Header matching configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// How header cells are matched to canonical fields.
    pub matching: MatchPolicy,
}

/// Row extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// What happens to rows with empty mapped cells.
    pub completeness: CompletenessPolicy,
}

/// Formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    /// Rendering of amounts that cannot be parsed. `None` uses the layout
    /// variant's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_fallback: Option<AmountFallback>,

    /// Tax rate of the summary layouts. The itemized layout always prints
    /// the `TVA 20 %` column under a fixed 20% label.
    pub tax_rate: Decimal,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            amount_fallback: None,
            tax_rate: Decimal::new(20, 2),
        }
    }
}

/// Output naming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory documents are written to.
    pub directory: PathBuf,

    /// File name prefix.
    pub file_prefix: String,

    /// Append a generation timestamp to file names.
    pub timestamp_suffix: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            file_prefix: "facture".to_string(),
            timestamp_suffix: true,
        }
    }
}

impl FacturoConfig {
    /// Configuration for a given layout variant, everything else default.
    pub fn for_variant(variant: LayoutVariant) -> Self {
        let mut config = Self::default();
        config.layout.variant = variant;
        config
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Amount fallback in effect, resolving the variant default.
    pub fn amount_fallback(&self) -> AmountFallback {
        self.formatting
            .amount_fallback
            .unwrap_or_else(|| self.layout.variant.default_amount_fallback())
    }
}
