use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info, warn};

use super::{Column, Table, TableError};

/// Cell contents read as a missing value rather than a cast failure
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Delimited-text flavour, sniffed from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Tab-separated (`.tsv`)
    Tsv,
    /// Comma-separated (`.csv`)
    Csv,
}

impl TableFormat {
    /// Determine the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let lower = path.to_string_lossy().to_lowercase();
        if lower.ends_with(".tsv") {
            Ok(TableFormat::Tsv)
        } else if lower.ends_with(".csv") {
            Ok(TableFormat::Csv)
        } else {
            Err(TableError::UnsupportedFormat(path.to_path_buf()))
        }
    }

    /// Field delimiter byte
    pub fn delimiter(&self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            TableFormat::Csv => b',',
        }
    }
}

/// A loaded table together with the threshold on the same scale
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Table values, log2(x+1)-transformed when requested
    pub table: Table,

    /// Enrichment threshold, transformed alongside the values
    pub threshold: f64,
}

/// `log2(x + 1)`
pub fn log2p1(x: f64) -> f64 {
    (x + 1.0).log2()
}

/// Load a delimited table and optionally move it (and the threshold) to log2(x+1) scale
pub fn load_table(path: &Path, threshold: f64, log2: bool) -> Result<LoadedTable, TableError> {
    let mut table = Table::from_path(path)?;
    info!(
        "Loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );

    let threshold = if log2 {
        table.log2_transform();
        let transformed = log2p1(threshold);
        info!("Applied log2(x+1); threshold {} -> {}", threshold, transformed);
        transformed
    } else {
        threshold
    };

    Ok(LoadedTable { table, threshold })
}

impl Table {
    /// Read a `.tsv` or `.csv` file, using the first column as row index
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        if !path.is_file() {
            return Err(TableError::MissingFile(path.to_path_buf()));
        }
        let format = TableFormat::from_path(path)?;
        debug!("Reading {} as {:?}", path.display(), format);

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), format)
    }

    /// Parse a delimited table from any reader
    pub fn from_reader<R: Read>(reader: R, format: TableFormat) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter())
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let (index_name, column_names) = headers.split_first().ok_or(TableError::EmptyHeader)?;
        let column_names = dedup_names(column_names);

        let mut row_ids = Vec::new();
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); column_names.len()];

        for record in csv_reader.records() {
            let record = record?;
            let mut fields = record.iter();
            row_ids.push(fields.next().unwrap_or_default().to_string());
            for (cells, field) in raw_columns.iter_mut().zip(fields) {
                cells.push(field.to_string());
            }
        }

        let mut table = Table::new(index_name.clone(), row_ids);
        for (name, cells) in column_names.iter().zip(raw_columns) {
            let values = cells
                .iter()
                .zip(table.row_ids())
                .map(|(cell, row)| parse_cell(cell, name, row))
                .collect::<Result<Vec<_>, _>>()?;
            table.push_column(Column::new(name.clone(), values))?;
        }

        Ok(table)
    }

    /// Replace every value `v` with `log2(v + 1)`
    pub fn log2_transform(&mut self) {
        self.map_values(log2p1);
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ...
///
/// A generated name that already exists is skipped over, so every returned
/// name is unique.
fn dedup_names(names: &[String]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut count = counts.get(&candidate).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(candidate.clone(), count + 1);
            candidate = format!("{}.{}", candidate, count);
            count = counts.get(&candidate).copied().unwrap_or(0);
        }
        if candidate != *name {
            warn!("Duplicate column '{}' renamed to '{}'", name, candidate);
        }
        counts.insert(candidate.clone(), count + 1);
        unique.push(candidate);
    }

    unique
}

/// Cast one cell to `f64`; missing-value markers become NaN
fn parse_cell(cell: &str, column: &str, row: &str) -> Result<f64, TableError> {
    let trimmed = cell.trim();
    if NA_VALUES.contains(&trimmed) {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| TableError::TypeCoercion {
        column: column.to_string(),
        row: row.to_string(),
        value: cell.to_string(),
    })
}
