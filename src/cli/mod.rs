use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use enrichment::pipeline::Operator;
use enrichment::render::ImageFormat;

mod config;
mod plot;

pub use config::Config;

/// Generates a boxplot visualization of enriched peptides
#[derive(Parser, Debug)]
#[command(name = "enrichment-boxplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input TSV or CSV file; the first column holds peptide identifiers
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name of the saved figure, without extension
    #[arg(value_name = "OUTPUT_NAME")]
    pub output_name: String,

    /// Directory for the figure (default: current directory)
    #[arg(value_name = "OUTPUT_PATH")]
    pub output_path: Option<PathBuf>,

    /// Sample types to include in the plot (default: M MW MS)
    #[arg(
        long = "sampletypeinitial",
        visible_alias = "sample-types",
        num_args = 1..,
        value_name = "TYPE"
    )]
    pub sample_types: Option<Vec<String>>,

    /// Threshold for filtering enriched peptides (default: 10)
    #[arg(
        long = "peptide_threshold",
        visible_alias = "peptide-threshold",
        value_name = "THRESHOLD",
        allow_negative_numbers = true
    )]
    pub threshold: Option<f64>,

    /// Figure width and height in inches (default: 6 4)
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub figsize: Option<Vec<u32>>,

    /// Figure resolution in dots per inch (default: 300)
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Figure format (default: pdf)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Operation to perform between sample types (default: minus)
    #[arg(long, value_enum)]
    pub operator: Option<OperatorArg>,

    /// Reverse the operation order (col2 - col1 instead of col1 - col2)
    #[arg(long)]
    pub reverse: bool,

    /// Apply a log2(x+1) transformation to the data and the threshold
    #[arg(long)]
    pub log2: bool,

    /// Skip samples with no columns of the selected types instead of failing
    #[arg(long)]
    pub skip_empty_groups: bool,

    /// Override the plot title
    #[arg(long)]
    pub title: Option<String>,

    /// Also write the long-form table (.parquet, .csv or .tsv)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Pairwise operator names accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OperatorArg {
    /// First minus second
    #[value(alias = "diff")]
    Minus,
    /// First divided by second
    Division,
    /// First times second
    Multiplication,
}

impl From<OperatorArg> for Operator {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::Minus => Operator::Difference,
            OperatorArg::Division => Operator::Ratio,
            OperatorArg::Multiplication => Operator::Product,
        }
    }
}

/// Figure formats accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Vector PDF
    Pdf,
    /// Scalable vector graphics
    Svg,
    /// Raster PNG
    Png,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ImageFormat::Pdf,
            FormatArg::Svg => ImageFormat::Svg,
            FormatArg::Png => ImageFormat::Png,
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stdout)
        .init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    plot::run(cli)
}
