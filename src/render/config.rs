//! Figure configuration for the enrichment boxplot.

use std::fmt;
use std::str::FromStr;

use plotters::style::{RGBColor, RED, WHITE};
use serde::{Deserialize, Serialize};

use super::RenderError;

/// Default figure width in inches
pub const DEFAULT_WIDTH_IN: u32 = 6;

/// Default figure height in inches
pub const DEFAULT_HEIGHT_IN: u32 = 4;

/// Default output resolution
pub const DEFAULT_DPI: u32 = 300;

/// Default hue palette, in legend order
pub const DEFAULT_PALETTE: [RGBColor; 10] = [
    RGBColor(0x4C, 0x72, 0xB0),
    RGBColor(0xDD, 0x84, 0x52),
    RGBColor(0x55, 0xA8, 0x68),
    RGBColor(0xC4, 0x4E, 0x52),
    RGBColor(0x81, 0x72, 0xB3),
    RGBColor(0x93, 0x78, 0x60),
    RGBColor(0xDA, 0x8B, 0xC3),
    RGBColor(0x8C, 0x8C, 0x8C),
    RGBColor(0xCC, 0xB9, 0x74),
    RGBColor(0x64, 0xB5, 0xCD),
];

/// Image format of the saved figure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Vector PDF, one page sized to the figure
    #[default]
    Pdf,
    /// Scalable vector graphics
    Svg,
    /// Raster PNG
    Png,
}

impl ImageFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Pdf => "pdf",
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ImageFormat::Pdf),
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            other => Err(format!("unknown image format '{other}' (expected pdf, svg or png)")),
        }
    }
}

/// Configuration for the boxplot figure
///
/// Sizes are given in inches and converted to pixels at `dpi`. Font sizes
/// are in points and scale with `dpi` the same way.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Figure width in inches (default: 6)
    pub width_in: u32,

    /// Figure height in inches (default: 4)
    pub height_in: u32,

    /// Pixels per inch (default: 300)
    pub dpi: u32,

    /// Output image format (default: SVG)
    pub format: ImageFormat,

    /// Plot title
    pub title: String,

    /// X-axis label
    pub xlabel: String,

    /// Y-axis label
    pub ylabel: String,

    /// Hue colors; cycled when there are more sample types than colors
    pub palette: Vec<RGBColor>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Threshold line color (default: RED)
    pub threshold_color: RGBColor,

    /// Share of each sample slot taken by its boxes (default: 0.8)
    pub group_width: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width_in: DEFAULT_WIDTH_IN,
            height_in: DEFAULT_HEIGHT_IN,
            dpi: DEFAULT_DPI,
            format: ImageFormat::default(),
            title: "Boxplot of Enriched Peptides".to_string(),
            xlabel: "Samples".to_string(),
            ylabel: "Z-Scores".to_string(),
            palette: DEFAULT_PALETTE.to_vec(),
            background: WHITE,
            threshold_color: RED,
            group_width: 0.8,
        }
    }
}

impl PlotConfig {
    /// Figure size in pixels
    pub fn pixel_size(&self) -> Result<(u32, u32), RenderError> {
        let invalid = || RenderError::InvalidSize {
            width: self.width_in,
            height: self.height_in,
            dpi: self.dpi,
        };
        let width = self.width_in.checked_mul(self.dpi).ok_or_else(invalid)?;
        let height = self.height_in.checked_mul(self.dpi).ok_or_else(invalid)?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok((width, height))
    }

    /// Convert a size in points to pixels at this resolution
    pub fn points(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }

    /// Color for the `index`-th sample type
    pub fn hue_color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }
        self.palette[index % self.palette.len()]
    }
}

/// Parse a `#RRGGBB` hex color
pub fn parse_hex_color(value: &str) -> Option<RGBColor> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}
