//! # Enrichment Boxplot
//!
//! Command-line tool that plots pairwise enrichment relationships between the
//! sample types of each sample in a peptide table.
//!
//! ## Usage
//!
//! ```bash
//! # Figure at ./enriched.svg using the default M, MW and MS sample types
//! enrichment-boxplot zscores.tsv enriched
//!
//! # Ratios on log2-transformed data, written as PNG to figures/
//! enrichment-boxplot zscores.csv enriched figures --operator division --log2 --format png
//!
//! # Keep the long-form table as well
//! enrichment-boxplot zscores.tsv enriched --export enriched.parquet -v
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
