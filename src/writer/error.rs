use std::path::PathBuf;

/// Errors that can occur while exporting a long-form table
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow array or batch construction failed
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet encoding failed
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// CSV/TSV encoding failed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Run metadata could not be serialized
    #[error("Metadata error: {0}")]
    MetadataError(#[from] crate::metadata::MetadataError),

    /// Export extension is not `.parquet`, `.csv` or `.tsv`
    #[error("Unsupported export format (expected .parquet, .csv or .tsv): {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
