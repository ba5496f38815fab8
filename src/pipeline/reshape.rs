//! Wide-to-long reshaping of derived-column tables.
//!
//! Each derived table is melted column by column: all rows of the first
//! derived column, then all rows of the second, and so on. Every long row is
//! tagged with its sample group, and groups are concatenated in order.

use crate::table::{Table, DEFAULT_INDEX_NAME};

use super::KeyedTable;

/// Header of the derived-column label column
pub const SAMPLE_TYPE_COLUMN: &str = "Sample Type";
/// Header of the value column
pub const VALUE_COLUMN: &str = "Z-scores";
/// Header of the sample-group column
pub const SAMPLES_COLUMN: &str = "samples";

/// One (entity, derived column, value, sample group) observation
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    /// Row identifier from the source table index
    pub entity: String,
    /// Derived column name, e.g. `M_MW`
    pub sample_type: String,
    /// Derived value
    pub value: f64,
    /// Sample group key
    pub sample: String,
}

/// Long-form table consumed by renderers and exporters
///
/// Columns are `{index name, "Sample Type", "Z-scores", "samples"}`; rows are
/// numbered by their position.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    index_name: String,
    rows: Vec<LongRow>,
}

impl Default for LongTable {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

impl LongTable {
    /// Create an empty long table whose entity column is `index_name`
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            rows: Vec::new(),
        }
    }

    /// Name of the entity column (the source table's index name)
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Header in output order
    pub fn header(&self) -> [&str; 4] {
        [
            self.index_name.as_str(),
            SAMPLE_TYPE_COLUMN,
            VALUE_COLUMN,
            SAMPLES_COLUMN,
        ]
    }

    /// All rows in order
    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Melt `table` and append its rows tagged with `sample`
    pub fn append_melted(&mut self, table: &Table, sample: &str) {
        self.rows.reserve(table.n_rows() * table.n_cols());
        for column in table.columns() {
            for (entity, &value) in table.row_ids().iter().zip(&column.values) {
                self.rows.push(LongRow {
                    entity: entity.clone(),
                    sample_type: column.name.clone(),
                    value,
                    sample: sample.to_string(),
                });
            }
        }
    }

    /// Sample groups in order of first appearance
    pub fn samples(&self) -> Vec<&str> {
        first_seen(self.rows.iter().map(|r| r.sample.as_str()))
    }

    /// Derived column labels in order of first appearance
    pub fn sample_types(&self) -> Vec<&str> {
        first_seen(self.rows.iter().map(|r| r.sample_type.as_str()))
    }

    /// Values of one (sample group, derived column) cell of the boxplot
    pub fn values_for(&self, sample: &str, sample_type: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.sample == sample && r.sample_type == sample_type)
            .map(|r| r.value)
            .collect()
    }
}

fn first_seen<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Melt one derived table into long form
pub fn melt(table: &Table, sample: &str) -> LongTable {
    let mut long = LongTable::new(table.index_name());
    long.append_melted(table, sample);
    long
}

/// Melt every keyed table and concatenate in iteration order
pub fn reshape(index_name: &str, groups: &[KeyedTable]) -> LongTable {
    let mut combined = LongTable::new(index_name);
    for group in groups {
        combined.append_melted(&group.table, &group.key);
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived(key: &str, rows: &[&str], columns: &[(&str, Vec<f64>)]) -> KeyedTable {
        let mut table = Table::new("peptide", rows.iter().map(|r| r.to_string()).collect());
        for (name, values) in columns {
            table = table.with_column(*name, values.clone()).unwrap();
        }
        KeyedTable {
            key: key.to_string(),
            table,
        }
    }

    #[test]
    fn test_melt_is_column_major() {
        let group = derived(
            "A",
            &["p1", "p2"],
            &[("M_MW", vec![1.0, 2.0]), ("M_MS", vec![3.0, 4.0])],
        );
        let long = melt(&group.table, &group.key);

        let order: Vec<_> = long
            .rows()
            .iter()
            .map(|r| (r.entity.as_str(), r.sample_type.as_str(), r.value))
            .collect();
        assert_eq!(
            order,
            vec![
                ("p1", "M_MW", 1.0),
                ("p2", "M_MW", 2.0),
                ("p1", "M_MS", 3.0),
                ("p2", "M_MS", 4.0),
            ]
        );
        assert!(long.rows().iter().all(|r| r.sample == "A"));
        assert_eq!(long.header(), ["peptide", "Sample Type", "Z-scores", "samples"]);
    }

    #[test]
    fn test_reshape_concatenates_in_group_order() {
        let groups = vec![
            derived("B", &["p1"], &[("M_MS", vec![5.0])]),
            derived("A", &["p2", "p3"], &[("M_MW", vec![1.0, 2.0])]),
        ];
        let long = reshape("peptide", &groups);

        assert_eq!(long.len(), 3);
        assert_eq!(long.samples(), vec!["B", "A"]);
        assert_eq!(long.sample_types(), vec!["M_MS", "M_MW"]);
        assert_eq!(long.values_for("A", "M_MW"), vec![1.0, 2.0]);
        assert!(long.values_for("A", "M_MS").is_empty());
    }

    #[test]
    fn test_groups_without_derived_columns_add_no_rows() {
        let groups = vec![
            derived("A", &["p1", "p2"], &[]),
            derived("B", &[], &[("M_MW", vec![])]),
        ];
        let long = reshape("peptide", &groups);
        assert!(long.is_empty());
    }

    #[test]
    fn test_duplicate_rows_are_not_deduplicated() {
        let group = derived("A", &["p1", "p1"], &[("M_MW", vec![1.0, 1.0])]);
        assert_eq!(melt(&group.table, &group.key).len(), 2);
    }
}
