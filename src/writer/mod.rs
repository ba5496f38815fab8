//! # Long-Form Table Export
//!
//! Writes the combined long-form table to disk so it can be re-plotted or
//! analysed elsewhere:
//!
//! - **Parquet** (`.parquet`): ZSTD-compressed, run metadata in the footer.
//! - **CSV/TSV** (`.csv`, `.tsv`): header plus one line per observation.
//!
//! Files are written to a temporary file next to the destination and
//! persisted only once complete.

mod delimited;
mod error;
mod parquet_writer;

use std::fmt;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::metadata::RunMetadata;
use crate::pipeline::LongTable;

pub use parquet_writer::{long_table_schema, LongTableWriter, LongTableWriterConfig};
pub use delimited::write_delimited;
pub use error::WriterError;

/// Export file format, chosen from the destination extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Apache Parquet
    Parquet,
    /// Comma-separated text
    Csv,
    /// Tab-separated text
    Tsv,
}

impl ExportFormat {
    /// Determine the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, WriterError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "parquet" => Ok(ExportFormat::Parquet),
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            _ => Err(WriterError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Parquet => write!(f, "parquet"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Tsv => write!(f, "tsv"),
        }
    }
}

/// Statistics from a completed export
#[derive(Debug, Clone)]
pub struct ExportStats {
    /// Destination path
    pub path: PathBuf,
    /// Format written
    pub format: ExportFormat,
    /// Long-form rows written
    pub rows_written: usize,
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows as {} to {}",
            self.rows_written,
            self.format,
            self.path.display()
        )
    }
}

/// Directory that will hold `path`, `.` for bare file names
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// A complete export waiting in a temporary file next to its destination
///
/// Dropping it removes the temporary file and leaves the destination alone.
#[derive(Debug)]
pub struct StagedExport {
    file: NamedTempFile,
    stats: ExportStats,
}

impl StagedExport {
    /// Final destination of the export
    pub fn path(&self) -> &Path {
        &self.stats.path
    }

    /// Move the export to its destination
    pub fn persist(self) -> Result<ExportStats, WriterError> {
        self.file
            .persist(&self.stats.path)
            .map_err(|e| WriterError::IoError(e.error))?;
        info!("{}", self.stats);
        Ok(self.stats)
    }
}

/// Export `table` to `path`, choosing the format from the extension
pub fn export_long_table(
    table: &LongTable,
    path: &Path,
    metadata: &RunMetadata,
) -> Result<ExportStats, WriterError> {
    stage_export(table, path, metadata)?.persist()
}

/// Write `table` into a temporary file destined for `path`
pub fn stage_export(
    table: &LongTable,
    path: &Path,
    metadata: &RunMetadata,
) -> Result<StagedExport, WriterError> {
    let format = ExportFormat::from_path(path)?;
    let mut staged = NamedTempFile::new_in(parent_dir(path))?;

    let rows_written = match format {
        ExportFormat::Parquet => {
            let mut writer = LongTableWriter::new(
                staged.as_file_mut(),
                table.index_name(),
                metadata,
                &LongTableWriterConfig::default(),
            )?;
            writer.write_table(table)?;
            writer.finish()?
        }
        ExportFormat::Csv => write_delimited(staged.as_file_mut(), table, b',')?,
        ExportFormat::Tsv => write_delimited(staged.as_file_mut(), table, b'\t')?,
    };

    Ok(StagedExport {
        file: staged,
        stats: ExportStats {
            path: path.to_path_buf(),
            format,
            rows_written,
        },
    })
}
