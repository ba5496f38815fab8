//! # Enrichment Boxplot
//!
//! `enrichment` turns a wide peptide table into a grouped boxplot of pairwise
//! enrichment relationships between the sub-samples of each sample.
//!
//! ## Input Table
//!
//! A TSV or CSV file whose first column identifies the peptide and whose
//! remaining columns are numeric and named `<prefix>-<type>_<suffix>`:
//!
//! ```text
//! peptide     A-M_1   A-MW_1   B-M_1   B-MS_1
//! PEPTIDEA    12.1    3.4      0.2     1.1
//! PEPTIDEB    1.0     14.9     0.0     0.7
//! ```
//!
//! `A` and `B` are samples; `M`, `MW` and `MS` are sample types.
//!
//! ## Processing
//!
//! 1. Columns are grouped by sample and filtered to the allowed sample types.
//! 2. Within each sample, peptides at or above the threshold in any retained
//!    column are kept.
//! 3. Every pair of retained columns yields a derived column (`M_MW` for
//!    `A-M_1 - A-MW_1`); the originals are dropped.
//! 4. Derived tables are melted to long form
//!    `{peptide, Sample Type, Z-scores, samples}` and concatenated.
//! 5. The long table is drawn as a boxplot with a reference line at the
//!    threshold.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use enrichment::pipeline::{EnrichmentPipeline, PipelineConfig};
//! use enrichment::render::{save_plot, BoxplotRenderer};
//! use enrichment::table::load_table;
//!
//! let loaded = load_table(Path::new("zscores.tsv"), 10.0, false)?;
//! let config = PipelineConfig {
//!     threshold: loaded.threshold,
//!     ..Default::default()
//! };
//! let output = EnrichmentPipeline::new(config).run(&loaded.table)?;
//!
//! let renderer = BoxplotRenderer::default();
//! let path = save_plot(&renderer, &output.long_table, loaded.threshold, Path::new("."), "enriched")?;
//! println!("{}\nSaved {}", output.stats, path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`column`]: sample column name parsing
//! - [`table`]: in-memory numeric table and TSV/CSV loading
//! - [`pipeline`]: grouping, enrichment filter, pairwise operator, reshaping
//! - [`render`]: box statistics and the plotters-backed boxplot
//! - [`writer`]: Parquet/CSV/TSV export of the long-form table
//! - [`metadata`]: run provenance embedded in exported files

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod column;
pub mod metadata;
pub mod pipeline;
pub mod render;
pub mod table;
pub mod writer;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::column::{ColumnId, ColumnParseError};
    pub use crate::metadata::RunMetadata;
    pub use crate::pipeline::{
        EmptyGroupPolicy, EnrichmentPipeline, LongRow, LongTable, Operator, PipelineConfig,
        PipelineError, PipelineOutput, PipelineStats,
    };
    pub use crate::render::{save_plot, BoxplotRenderer, ImageFormat, PlotConfig, Renderer};
    pub use crate::table::{load_table, LoadedTable, Table, TableError};
    pub use crate::writer::{export_long_table, ExportFormat, WriterError};
}
