use std::path::PathBuf;

/// Errors that can occur while loading or manipulating a table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Input path does not exist or is not a regular file
    #[error("File '{}' does not exist.", .0.display())]
    MissingFile(PathBuf),

    /// Input extension is neither `.tsv` nor `.csv`
    #[error("Input file must be a TSV or CSV file: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A cell could not be cast to a floating-point number
    #[error("Column '{column}', row '{row}': could not convert string to float: '{value}'")]
    TypeCoercion {
        /// Column holding the offending cell
        column: String,
        /// Row identifier of the offending cell
        row: String,
        /// Raw cell text
        value: String,
    },

    /// The file has no header row
    #[error("Table has no header row")]
    EmptyHeader,

    /// A column does not have one value per row
    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        /// Column name
        column: String,
        /// Number of rows in the table
        expected: usize,
        /// Number of values supplied
        found: usize,
    },

    /// Requested column is not present in the table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Column position past the end of the table
    #[error("Column {column} out of range for table with {n_cols} columns")]
    ColumnOutOfRange {
        /// Requested position
        column: usize,
        /// Number of columns in the table
        n_cols: usize,
    },

    /// Row position past the end of the table
    #[error("Row {row} out of range for table with {n_rows} rows")]
    RowOutOfRange {
        /// Requested position
        row: usize,
        /// Number of rows in the table
        n_rows: usize,
    },

    /// I/O error reading the input file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),
}
