//! Pairwise combination of sub-sample columns.
//!
//! For a group with retained columns `c0, c1, ..., cn-1`, every pair `(ci, cj)`
//! with `i < j` (table order, not sorted) yields one derived column. The
//! result table holds only the derived columns, in pair-enumeration order,
//! over the same rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::table::{Column, Table};

use super::PipelineError;

/// Binary operation applied to each column pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// `first - second`
    #[default]
    #[serde(rename = "minus", alias = "diff")]
    Difference,
    /// `first / second`
    #[serde(rename = "division")]
    Ratio,
    /// `first * second`
    #[serde(rename = "multiplication")]
    Product,
}

impl Operator {
    /// Evaluate the operator; IEEE semantics apply (x/0 gives inf or NaN)
    pub fn apply(&self, first: f64, second: f64) -> f64 {
        match self {
            Operator::Difference => first - second,
            Operator::Ratio => first / second,
            Operator::Product => first * second,
        }
    }

    /// Suffix appended to derived column names
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Operator::Difference => None,
            Operator::Ratio => Some("division"),
            Operator::Product => Some("multiplication"),
        }
    }

    /// Returns all accepted operator names.
    pub fn variants() -> &'static [&'static str] {
        &["minus", "diff", "division", "multiplication"]
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Difference => write!(f, "minus"),
            Operator::Ratio => write!(f, "division"),
            Operator::Product => write!(f, "multiplication"),
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minus" | "diff" => Ok(Operator::Difference),
            "division" => Ok(Operator::Ratio),
            "multiplication" => Ok(Operator::Product),
            _ => Err(format!(
                "Unknown operator '{}'. Valid options: {}",
                s,
                Operator::variants().join(", ")
            )),
        }
    }
}

/// Operator plus operand order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairwiseOptions {
    /// Operation to apply
    pub operator: Operator,
    /// Evaluate `cj op ci` instead of `ci op cj`
    pub reverse: bool,
}

/// Number of derived columns for `n` retained columns
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Name of the column derived from `first op second`
///
/// `{first}_{second}` from the two sample-type tokens, plus the operator
/// suffix for ratio and product.
pub fn derived_name(first: &ColumnId, second: &ColumnId, operator: Operator) -> String {
    match operator.suffix() {
        Some(suffix) => format!("{}_{}_{}", first.sample_type(), second.sample_type(), suffix),
        None => format!("{}_{}", first.sample_type(), second.sample_type()),
    }
}

/// Replace the table's columns with all pairwise derived columns
///
/// Column names are parsed as [`ColumnId`]s first; see [`pairwise_columns`].
pub fn apply_pairwise(table: &Table, options: PairwiseOptions) -> Result<Table, PipelineError> {
    let ids = table
        .columns()
        .iter()
        .map(|c| ColumnId::parse(&c.name))
        .collect::<Result<Vec<_>, _>>()?;
    pairwise_columns(table, &ids, options)
}

/// Derive all pairwise columns of `table`, whose columns are described by `ids`
///
/// The originals are read, never mutated; the returned table keeps the row
/// index and holds only derived columns. Fewer than two columns yields a
/// table with no columns.
pub fn pairwise_columns(
    table: &Table,
    ids: &[ColumnId],
    options: PairwiseOptions,
) -> Result<Table, PipelineError> {
    let source = table.columns();
    if ids.len() != source.len() {
        return Err(PipelineError::ColumnCount {
            expected: source.len(),
            found: ids.len(),
        });
    }

    let mut derived = table.empty_like();
    for i in 0..source.len() {
        for j in (i + 1)..source.len() {
            let (first, second) = if options.reverse { (j, i) } else { (i, j) };
            let values = source[first]
                .values
                .iter()
                .zip(&source[second].values)
                .map(|(&a, &b)| options.operator.apply(a, b))
                .collect();
            let name = derived_name(&ids[first], &ids[second], options.operator);
            derived.push_column(Column::new(name, values))?;
        }
    }

    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_table() -> Table {
        Table::new("peptide", vec!["p1".into(), "p2".into()])
            .with_column("A-M_1", vec![10.0, 4.0])
            .unwrap()
            .with_column("A-MW_1", vec![2.0, 0.0])
            .unwrap()
            .with_column("A-MS_1", vec![5.0, 8.0])
            .unwrap()
    }

    fn names(table: &Table) -> Vec<&str> {
        table.column_names().collect()
    }

    #[test]
    fn test_difference_names_and_values() {
        let derived = apply_pairwise(&group_table(), PairwiseOptions::default()).unwrap();

        assert_eq!(names(&derived), vec!["M_MW", "M_MS", "MW_MS"]);
        assert_eq!(derived.column("M_MW").unwrap().values, vec![8.0, 4.0]);
        assert_eq!(derived.column("M_MS").unwrap().values, vec![5.0, -4.0]);
        assert_eq!(derived.column("MW_MS").unwrap().values, vec![-3.0, -8.0]);
        assert_eq!(derived.row_ids(), &["p1", "p2"]);
    }

    #[test]
    fn test_reverse_swaps_operands_and_names() {
        let options = PairwiseOptions {
            operator: Operator::Difference,
            reverse: true,
        };
        let derived = apply_pairwise(&group_table(), options).unwrap();

        assert_eq!(names(&derived), vec!["MW_M", "MS_M", "MS_MW"]);
        assert_eq!(derived.column("MW_M").unwrap().values, vec![-8.0, -4.0]);
    }

    #[test]
    fn test_ratio_suffix_and_division_by_zero() {
        let options = PairwiseOptions {
            operator: Operator::Ratio,
            reverse: false,
        };
        let derived = apply_pairwise(&group_table(), options).unwrap();

        assert_eq!(
            names(&derived),
            vec!["M_MW_division", "M_MS_division", "MW_MS_division"]
        );
        let m_mw = &derived.column("M_MW_division").unwrap().values;
        assert_eq!(m_mw[0], 5.0);
        assert!(m_mw[1].is_infinite());
    }

    #[test]
    fn test_product_suffix() {
        let options = PairwiseOptions {
            operator: Operator::Product,
            reverse: true,
        };
        let derived = apply_pairwise(&group_table(), options).unwrap();

        assert_eq!(names(&derived)[0], "MW_M_multiplication");
        assert_eq!(derived.column("MS_MW_multiplication").unwrap().values, vec![10.0, 0.0]);
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(3), 3);
        assert_eq!(pair_count(5), 10);
    }

    #[test]
    fn test_single_column_yields_no_derived_columns() {
        let table = Table::new("peptide", vec!["p1".into()])
            .with_column("A-M_1", vec![1.0])
            .unwrap();
        let derived = apply_pairwise(&table, PairwiseOptions::default()).unwrap();

        assert_eq!(derived.n_cols(), 0);
        assert_eq!(derived.row_ids(), &["p1"]);
    }

    #[test]
    fn test_duplicate_tokens_keep_every_pair() {
        let table = Table::new("peptide", vec!["p1".into()])
            .with_column("A-M_1", vec![1.0])
            .unwrap()
            .with_column("A-M_2", vec![2.0])
            .unwrap()
            .with_column("A-MW_1", vec![4.0])
            .unwrap();
        let derived = apply_pairwise(&table, PairwiseOptions::default()).unwrap();

        assert_eq!(names(&derived), vec!["M_M", "M_MW", "M_MW"]);
        assert_eq!(derived.columns()[1].values, vec![-3.0]);
        assert_eq!(derived.columns()[2].values, vec![-2.0]);
    }

    #[test]
    fn test_precomputed_ids_name_the_columns() {
        let ids = ["A-M_x", "A-MW_x", "A-MS_x"]
            .iter()
            .map(|name| ColumnId::parse(name).unwrap())
            .collect::<Vec<_>>();
        let derived = pairwise_columns(&group_table(), &ids, PairwiseOptions::default()).unwrap();
        assert_eq!(names(&derived), vec!["M_MW", "M_MS", "MW_MS"]);

        let err = pairwise_columns(&group_table(), &ids[..2], PairwiseOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ColumnCount {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_operator_parsing() {
        assert_eq!("minus".parse::<Operator>().unwrap(), Operator::Difference);
        assert_eq!("diff".parse::<Operator>().unwrap(), Operator::Difference);
        assert_eq!("Division".parse::<Operator>().unwrap(), Operator::Ratio);
        assert_eq!("multiplication".parse::<Operator>().unwrap(), Operator::Product);
        assert!("modulo".parse::<Operator>().is_err());
        assert_eq!(Operator::Ratio.to_string(), "division");
    }
}
