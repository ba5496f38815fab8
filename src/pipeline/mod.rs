//! # Enrichment Pipeline
//!
//! Reshapes a loaded peptide table into the long-form table behind the
//! enrichment boxplot:
//!
//! 1. **Grouping** ([`grouping`]): columns are grouped by sample prefix and
//!    filtered to the allowed sample types.
//! 2. **Enrichment** ([`enrichment`]): each group keeps the rows at or above
//!    the threshold in any of its columns.
//! 3. **Pairwise** ([`pairwise`]): each group's columns are combined pairwise
//!    into derived columns; the originals are discarded.
//! 4. **Reshape** ([`reshape`]): derived tables are melted and concatenated.
//!
//! ```rust
//! use enrichment::pipeline::{EnrichmentPipeline, PipelineConfig};
//! use enrichment::table::Table;
//!
//! let table = Table::new("peptide", vec!["p1".into(), "p2".into()])
//!     .with_column("A-M_1", vec![12.0, 1.0])?
//!     .with_column("A-MW_1", vec![3.0, 2.0])?;
//!
//! let config = PipelineConfig {
//!     threshold: 10.0,
//!     ..Default::default()
//! };
//! let output = EnrichmentPipeline::new(config).run(&table)?;
//! assert_eq!(output.long_table.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod enrichment;
pub mod grouping;
pub mod pairwise;
pub mod reshape;

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::column::ColumnParseError;
use crate::table::{Table, TableError};

pub use enrichment::{enriched_rows, enriched_rows_at, filter_enriched};
pub use grouping::{group_by_sample, group_columns, SampleGroup};
pub use pairwise::{
    apply_pairwise, derived_name, pair_count, pairwise_columns, Operator, PairwiseOptions,
};
pub use reshape::{
    melt, reshape, LongRow, LongTable, SAMPLES_COLUMN, SAMPLE_TYPE_COLUMN, VALUE_COLUMN,
};

/// Sample types kept when no allow-list is given
pub const DEFAULT_SAMPLE_TYPES: [&str; 3] = ["M", "MW", "MS"];

/// Enrichment threshold used when none is given
pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// Errors raised while running the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A column name does not follow `<prefix>-<type>_<suffix>`
    #[error("Malformed column name: {0}")]
    Column(#[from] ColumnParseError),

    /// Table access failed
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// A sample group has no column left after sample-type filtering
    #[error("Sample '{prefix}' has no columns matching sample types [{allowed}]")]
    EmptyGroup {
        /// Sample prefix of the empty group
        prefix: String,
        /// Allowed sample types, comma-separated
        allowed: String,
    },

    /// Column descriptions do not match the table's columns
    #[error("Expected {expected} column ids, got {found}")]
    ColumnCount {
        /// Columns in the table
        expected: usize,
        /// Column ids supplied
        found: usize,
    },

    /// The sample-type allow-list is empty
    #[error("At least one sample type must be given")]
    EmptySampleTypes,
}

/// What to do with a sample group that no allowed sample type matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyGroupPolicy {
    /// Fail with [`PipelineError::EmptyGroup`]
    #[default]
    Error,
    /// Drop the group and log a warning
    Skip,
}

/// A per-sample table stored under its sample prefix
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedTable {
    /// Sample group prefix
    pub key: String,
    /// Group table
    pub table: Table,
}

/// Pipeline parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Allowed sample-type tokens
    pub sample_types: Vec<String>,

    /// Enrichment threshold, on the same scale as the table values
    pub threshold: f64,

    /// Pairwise operator
    pub operator: Operator,

    /// Swap operand order
    pub reverse: bool,

    /// Handling of groups left without columns
    pub empty_groups: EmptyGroupPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_types: DEFAULT_SAMPLE_TYPES.iter().map(|s| s.to_string()).collect(),
            threshold: DEFAULT_THRESHOLD,
            operator: Operator::default(),
            reverse: false,
            empty_groups: EmptyGroupPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Pairwise options derived from this configuration
    pub fn pairwise_options(&self) -> PairwiseOptions {
        PairwiseOptions {
            operator: self.operator,
            reverse: self.reverse,
        }
    }
}

/// Per-group counts collected during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    /// Sample prefix
    pub key: String,
    /// Columns kept after sample-type filtering
    pub retained_columns: usize,
    /// Rows at or above the threshold in any retained column
    pub enriched_rows: usize,
    /// Derived columns produced
    pub derived_columns: usize,
}

impl GroupStats {
    /// Long rows contributed by this group
    pub fn long_rows(&self) -> usize {
        self.enriched_rows * self.derived_columns
    }
}

/// Statistics from a completed pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Processed groups in order
    pub groups: Vec<GroupStats>,
    /// Prefixes of groups skipped for having no retained columns
    pub skipped_groups: Vec<String>,
    /// Rows in the combined long table
    pub long_rows: usize,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Processed {} sample groups into {} long-form rows",
            self.groups.len(),
            self.long_rows
        )?;
        for group in &self.groups {
            writeln!(
                f,
                "  {}: {} columns, {} enriched rows, {} derived columns",
                group.key, group.retained_columns, group.enriched_rows, group.derived_columns
            )?;
        }
        if !self.skipped_groups.is_empty() {
            writeln!(f, "  Skipped: {}", self.skipped_groups.join(", "))?;
        }
        Ok(())
    }
}

impl PipelineStats {
    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::style;

            let mut output = format!(
                "{} {} sample groups into {} long-form rows\n",
                style("Processed").bold().cyan(),
                style(self.groups.len()).green(),
                style(self.long_rows).green()
            );
            for group in &self.groups {
                let derived = if group.derived_columns == 0 {
                    style(group.derived_columns).yellow()
                } else {
                    style(group.derived_columns).green()
                };
                output.push_str(&format!(
                    "  {}: {} columns, {} enriched rows, {} derived columns\n",
                    style(&group.key).bold(),
                    group.retained_columns,
                    group.enriched_rows,
                    derived
                ));
            }
            if !self.skipped_groups.is_empty() {
                output.push_str(&format!(
                    "  {}: {}\n",
                    style("Skipped").yellow().bold(),
                    self.skipped_groups.join(", ")
                ));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

/// Output of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Combined long-form table
    pub long_table: LongTable,
    /// Run statistics
    pub stats: PipelineStats,
}

/// Grouping, enrichment filtering, pairwise derivation and reshaping
#[derive(Debug, Clone, Default)]
pub struct EnrichmentPipeline {
    config: PipelineConfig,
}

impl EnrichmentPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Sample groups of `table` after sample-type filtering
    ///
    /// Empty groups are rejected or dropped according to
    /// [`PipelineConfig::empty_groups`]; skipped prefixes are returned
    /// alongside.
    pub fn sample_groups(
        &self,
        table: &Table,
    ) -> Result<(Vec<SampleGroup>, Vec<String>), PipelineError> {
        if self.config.sample_types.is_empty() {
            return Err(PipelineError::EmptySampleTypes);
        }

        let groups = group_by_sample(table.column_names(), &self.config.sample_types)?;
        let mut kept = Vec::with_capacity(groups.len());
        let mut skipped = Vec::new();

        for group in groups {
            if !group.is_empty() {
                kept.push(group);
                continue;
            }
            match self.config.empty_groups {
                EmptyGroupPolicy::Error => {
                    return Err(PipelineError::EmptyGroup {
                        prefix: group.prefix().to_string(),
                        allowed: self.config.sample_types.join(", "),
                    });
                }
                EmptyGroupPolicy::Skip => {
                    warn!(
                        "Skipping sample '{}': no columns match sample types [{}]",
                        group.prefix(),
                        self.config.sample_types.join(", ")
                    );
                    skipped.push(group.prefix().to_string());
                }
            }
        }

        Ok((kept, skipped))
    }

    /// Run every stage on `table`
    pub fn run(&self, table: &Table) -> Result<PipelineOutput, PipelineError> {
        info!("Grouping {} columns by sample...", table.n_cols());
        let (groups, skipped_groups) = self.sample_groups(table)?;
        for group in &groups {
            debug!("Sample {}: {:?}", group.prefix(), group.column_names());
        }

        info!(
            "Filtering enriched peptides (threshold {})...",
            self.config.threshold
        );
        let enriched = groups
            .iter()
            .map(|group| filter_enriched(table, group, self.config.threshold))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Computing pairwise {} between sample types{}...",
            self.config.operator,
            if self.config.reverse { " (reversed)" } else { "" }
        );
        let options = self.config.pairwise_options();
        let mut derived = Vec::with_capacity(enriched.len());
        let mut stats = PipelineStats {
            skipped_groups,
            ..Default::default()
        };
        for (group, sample) in enriched.iter().zip(&groups) {
            let table = pairwise_columns(&group.table, sample.columns(), options)?;
            stats.groups.push(GroupStats {
                key: group.key.clone(),
                retained_columns: group.table.n_cols(),
                enriched_rows: table.n_rows(),
                derived_columns: table.n_cols(),
            });
            derived.push(KeyedTable {
                key: group.key.clone(),
                table,
            });
        }

        info!("Reshaping to long form...");
        let long_table = reshape(table.index_name(), &derived);
        stats.long_rows = long_table.len();
        info!("Long-form table has {} rows", long_table.len());

        Ok(PipelineOutput { long_table, stats })
    }
}
