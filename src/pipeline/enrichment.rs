//! Threshold filter selecting enriched peptides per sample group.

use log::debug;

use crate::table::{Table, TableError};

use super::grouping::SampleGroup;
use super::KeyedTable;

/// Positions of rows at or above `threshold` in ANY of `columns`
///
/// The result is the union over columns, in original table order.
pub fn enriched_rows<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    threshold: f64,
) -> Result<Vec<usize>, TableError> {
    let positions = columns
        .iter()
        .map(|name| table.position(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    enriched_rows_at(table, &positions, threshold)
}

/// Like [`enriched_rows`], with columns given by position
pub fn enriched_rows_at(
    table: &Table,
    positions: &[usize],
    threshold: f64,
) -> Result<Vec<usize>, TableError> {
    let mut enriched = vec![false; table.n_rows()];
    for &position in positions {
        for row in table.rows_at_least_at(position, threshold)? {
            enriched[row] = true;
        }
    }

    Ok(enriched
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| row)
        .collect())
}

/// Restrict `table` to the group's enriched rows and retained columns
///
/// Values below the threshold in a retained row are left untouched.
pub fn filter_enriched(
    table: &Table,
    group: &SampleGroup,
    threshold: f64,
) -> Result<KeyedTable, TableError> {
    let rows = enriched_rows_at(table, group.positions(), threshold)?;
    debug!(
        "Sample {}: {} of {} rows enriched across {} columns",
        group.prefix(),
        rows.len(),
        table.n_rows(),
        group.len()
    );

    Ok(KeyedTable {
        key: group.prefix().to_string(),
        table: table.select_at(&rows, group.positions())?,
    })
}
