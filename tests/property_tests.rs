//! Property-based tests for the enrichment pipeline

use enrichment::pipeline::{
    apply_pairwise, enriched_rows, pair_count, EnrichmentPipeline, Operator, PairwiseOptions,
    PipelineConfig,
};
use enrichment::table::{log2p1, Table};

/// Sub-sample type names used to build columns
const TYPES: [&str; 4] = ["M", "MW", "MS", "MX"];

/// One sample with `columns.len()` sub-sample columns over `n_rows` peptides
fn sample_table(columns: &[Vec<f64>]) -> Table {
    let n_rows = columns.first().map_or(0, Vec::len);
    let row_ids = (0..n_rows).map(|i| format!("p{}", i)).collect();
    let mut table = Table::new("peptide", row_ids);
    for (i, values) in columns.iter().enumerate() {
        table = table
            .with_column(&format!("S-{}_{}", TYPES[i % TYPES.len()], i), values.clone())
            .unwrap();
    }
    table
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// 1-4 columns of equal length with finite values
    fn columns() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1usize..5, 1usize..20).prop_flat_map(|(n_cols, n_rows)| {
            prop::collection::vec(prop::collection::vec(-50.0f64..50.0, n_rows), n_cols)
        })
    }

    proptest! {
        /// n columns always yield n(n-1)/2 derived columns
        #[test]
        fn test_pair_count(cols in columns()) {
            let table = sample_table(&cols);
            let derived = apply_pairwise(&table, PairwiseOptions::default()).unwrap();
            prop_assert_eq!(derived.n_cols(), pair_count(cols.len()));
            prop_assert_eq!(derived.n_cols(), cols.len() * (cols.len() - 1) / 2);
            prop_assert_eq!(derived.n_rows(), table.n_rows());
        }

        /// Reversing a difference negates every derived value
        #[test]
        fn test_reverse_negates_difference(cols in columns()) {
            let table = sample_table(&cols);
            let forward = apply_pairwise(&table, PairwiseOptions::default()).unwrap();
            let reversed = apply_pairwise(&table, PairwiseOptions {
                operator: Operator::Difference,
                reverse: true,
            }).unwrap();

            for (f, r) in forward.columns().iter().zip(reversed.columns()) {
                for (a, b) in f.values.iter().zip(&r.values) {
                    prop_assert_eq!(*a, -*b);
                }
            }
        }

        /// A row is enriched exactly when some column reaches the threshold
        #[test]
        fn test_union_semantics(cols in columns(), threshold in -50.0f64..50.0) {
            let table = sample_table(&cols);
            let names: Vec<&str> = table.column_names().collect();
            let rows = enriched_rows(&table, &names, threshold).unwrap();

            let expected: Vec<usize> = (0..table.n_rows())
                .filter(|&r| cols.iter().any(|c| c[r] >= threshold))
                .collect();
            prop_assert_eq!(rows, expected);
        }

        /// log2(x+1) preserves which rows pass the threshold
        #[test]
        fn test_log2_preserves_membership(
            cols in (1usize..4, 1usize..20).prop_flat_map(|(n_cols, n_rows)| {
                prop::collection::vec(prop::collection::vec(0.0f64..1000.0, n_rows), n_cols)
            }),
            threshold in 0.0f64..1000.0,
        ) {
            let table = sample_table(&cols);
            let names: Vec<&str> = table.column_names().collect();
            let raw = enriched_rows(&table, &names, threshold).unwrap();

            let mut transformed = table.clone();
            transformed.log2_transform();
            let logged = enriched_rows(&transformed, &names, log2p1(threshold)).unwrap();

            prop_assert_eq!(raw, logged);
        }

        /// Long rows = enriched rows x derived columns, summed over groups
        #[test]
        fn test_long_row_count(cols in columns(), threshold in -50.0f64..50.0) {
            let table = sample_table(&cols);
            let output = EnrichmentPipeline::new(PipelineConfig {
                sample_types: TYPES.iter().map(|s| s.to_string()).collect(),
                threshold,
                ..Default::default()
            })
            .run(&table)
            .unwrap();

            let expected: usize = output.stats.groups.iter().map(|g| g.enriched_rows * g.derived_columns).sum();
            prop_assert_eq!(output.long_table.len(), expected);
            prop_assert_eq!(output.stats.long_rows, expected);
        }
    }
}
