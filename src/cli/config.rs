//! TOML configuration file support.
//!
//! Settings that would otherwise be passed as flags can live in a config
//! file; flags given on the command line take precedence:
//!
//! ```toml
//! # enrichment.toml
//! [pipeline]
//! sample_types = ["M", "MW"]
//! threshold = 5.0
//! operator = "division"
//! reverse = false
//! log2 = true
//! empty_groups = "skip"
//!
//! [plot]
//! width = 8
//! height = 5
//! dpi = 150
//! format = "png"
//! title = "Enrichment of run 42"
//! palette = ["#4C72B0", "#DD8452", "#55A868"]
//! threshold_color = "#C44E52"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use enrichment::pipeline::{EmptyGroupPolicy, Operator};
use enrichment::render::ImageFormat;

/// Root configuration structure for enrichment.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Data processing settings.
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Figure settings.
    #[serde(default)]
    pub plot: PlotSection,
}

/// Data processing settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    /// Allowed sample types.
    pub sample_types: Option<Vec<String>>,

    /// Enrichment threshold, before any log2 transform.
    pub threshold: Option<f64>,

    /// Pairwise operator ("minus", "diff", "division", "multiplication").
    pub operator: Option<Operator>,

    /// Reverse operand order.
    pub reverse: Option<bool>,

    /// Apply log2(x+1) to data and threshold.
    pub log2: Option<bool>,

    /// "error" or "skip" for samples without allowed columns.
    pub empty_groups: Option<EmptyGroupPolicy>,

    /// Write the long-form table to this path as well.
    pub export: Option<String>,
}

/// Figure settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotSection {
    /// Width in inches.
    pub width: Option<u32>,

    /// Height in inches.
    pub height: Option<u32>,

    /// Dots per inch.
    pub dpi: Option<u32>,

    /// "pdf", "svg" or "png".
    pub format: Option<ImageFormat>,

    /// Plot title.
    pub title: Option<String>,

    /// X-axis label.
    pub xlabel: Option<String>,

    /// Y-axis label.
    pub ylabel: Option<String>,

    /// Hue colors as `#RRGGBB`.
    pub palette: Option<Vec<String>>,

    /// Threshold line color as `#RRGGBB`.
    pub threshold_color: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
