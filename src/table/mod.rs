//! # Numeric Tables
//!
//! A [`Table`] is a row-indexed, column-named matrix of `f64` values as read
//! from a peptide quantification export: the first input column holds the
//! entity identifier (peptide id), every other column one sample condition.
//!
//! Row identifiers are kept in file order and are not required to be unique;
//! every operation addresses rows by position.

mod error;
mod loader;


pub use error::TableError;
pub use loader::{load_table, log2p1, LoadedTable, TableFormat};

/// Index name used when the input header leaves the first cell blank
pub const DEFAULT_INDEX_NAME: &str = "index";

/// A named column of numeric values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name as it appears in the header
    pub name: String,

    /// One value per table row
    pub values: Vec<f64>,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Row-indexed numeric table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index_name: String,
    row_ids: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Create a table with the given row index and no columns
    pub fn new(index_name: impl Into<String>, row_ids: Vec<String>) -> Self {
        let index_name = index_name.into();
        Self {
            index_name: if index_name.is_empty() {
                DEFAULT_INDEX_NAME.to_string()
            } else {
                index_name
            },
            row_ids,
            columns: Vec::new(),
        }
    }

    /// Append a column, checking it has one value per row
    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if column.values.len() != self.row_ids.len() {
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.row_ids.len(),
                found: column.values.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style variant of [`Table::push_column`]
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, TableError> {
        self.push_column(Column::new(name, values))?;
        Ok(self)
    }

    /// Name of the row index (the first header cell)
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Row identifiers in table order
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    /// All columns in table order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name (first match)
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Position of the first column called `name`
    pub fn position(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Column at `position` in table order
    pub fn column_at(&self, position: usize) -> Result<&Column, TableError> {
        self.columns
            .get(position)
            .ok_or(TableError::ColumnOutOfRange {
                column: position,
                n_cols: self.columns.len(),
            })
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Positions of rows whose value in `column` is at least `threshold`
    pub fn rows_at_least(&self, column: &str, threshold: f64) -> Result<Vec<usize>, TableError> {
        self.rows_at_least_at(self.position(column)?, threshold)
    }

    /// Like [`Table::rows_at_least`], addressing the column by position
    pub fn rows_at_least_at(
        &self,
        position: usize,
        threshold: f64,
    ) -> Result<Vec<usize>, TableError> {
        Ok(self
            .column_at(position)?
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v >= threshold)
            .map(|(i, _)| i)
            .collect())
    }

    /// Sub-table restricted to the given row positions and column names
    ///
    /// Rows and columns appear in the order requested.
    pub fn select<S: AsRef<str>>(&self, rows: &[usize], columns: &[S]) -> Result<Table, TableError> {
        let positions = columns
            .iter()
            .map(|name| self.position(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.select_at(rows, &positions)
    }

    /// Sub-table restricted to the given row and column positions
    ///
    /// Columns that share a name stay distinct.
    pub fn select_at(&self, rows: &[usize], columns: &[usize]) -> Result<Table, TableError> {
        if let Some(&row) = rows.iter().find(|&&r| r >= self.n_rows()) {
            return Err(TableError::RowOutOfRange {
                row,
                n_rows: self.n_rows(),
            });
        }
        let row_ids = rows.iter().map(|&r| self.row_ids[r].clone()).collect();
        let mut table = Table::new(self.index_name.clone(), row_ids);
        for &position in columns {
            let source = self.column_at(position)?;
            let values = rows.iter().map(|&r| source.values[r]).collect();
            table.columns.push(Column::new(source.name.clone(), values));
        }
        Ok(table)
    }

    /// Same row index, no columns
    pub fn empty_like(&self) -> Table {
        Table::new(self.index_name.clone(), self.row_ids.clone())
    }

    /// Apply `f` to every cell in place
    pub fn map_values<F: Fn(f64) -> f64>(&mut self, f: F) {
        for column in &mut self.columns {
            for value in &mut column.values {
                *value = f(*value);
            }
        }
    }
}
