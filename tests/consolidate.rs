use assert_matches::assert_matches;

use gdc_consolidate::consolidate::{AssayRows, consolidate, join_tables, merge_assay};
use gdc_consolidate::domain::{AssayKind, RunMode};
use gdc_consolidate::error::ConsolidateError;
use gdc_consolidate::table::{AssayTable, FeatureRow};

fn row(sample: &str, kind: AssayKind, features: &[(&str, f64)]) -> FeatureRow {
    FeatureRow::from_raw(
        sample.parse().unwrap(),
        kind,
        features
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect(),
    )
}

fn tables() -> Vec<AssayTable> {
    let mirna = merge_assay(
        AssayKind::Mirna,
        vec![
            row("TCGA-AA-0001", AssayKind::Mirna, &[("hsa-mir-21", 15.0), ("hsa-mir-1", 1.0)]),
            row("TCGA-AA-0002", AssayKind::Mirna, &[("hsa-mir-21", 4.0)]),
        ],
        RunMode::Strict,
    )
    .unwrap()
    .unwrap();
    let rppa = merge_assay(
        AssayKind::Rppa,
        vec![
            row("TCGA-AA-0002", AssayKind::Rppa, &[("AKT", 2.5)]),
            row("TCGA-AA-0003", AssayKind::Rppa, &[("AKT", 1.5), ("BAX", 0.5)]),
        ],
        RunMode::Strict,
    )
    .unwrap()
    .unwrap();
    let seg = merge_assay(
        AssayKind::Segmentation,
        vec![row("TCGA-AA-0003", AssayKind::Segmentation, &[("7", 0.25)])],
        RunMode::Strict,
    )
    .unwrap()
    .unwrap();
    vec![mirna, rppa, seg]
}

fn sorted_triples(tables: Vec<AssayTable>) -> Vec<(String, String, f64)> {
    let joined = join_tables(tables, RunMode::Strict).unwrap().unwrap();
    let mut triples = joined.triples();
    triples.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
    triples
}

#[test]
fn per_type_merge_unions_columns() {
    let table = merge_assay(
        AssayKind::Rppa,
        vec![
            row("TCGA-AA-0001", AssayKind::Rppa, &[("AKT", 1.0)]),
            row("TCGA-AA-0002", AssayKind::Rppa, &[("BAX", 2.0), ("AKT", 3.0)]),
        ],
        RunMode::Strict,
    )
    .unwrap()
    .unwrap();

    assert_eq!(table.columns(), ["rppa__AKT", "rppa__BAX"]);
    assert_eq!(table.get(0, "rppa__BAX"), None);
    assert_eq!(table.get(1, "rppa__AKT"), Some(3.0));
}

#[test]
fn duplicate_sample_keeps_first_file() {
    let table = merge_assay(
        AssayKind::Mirna,
        vec![
            row("TCGA-AA-0001", AssayKind::Mirna, &[("hsa-mir-21", 15.0)]),
            row("TCGA-AA-0001", AssayKind::Mirna, &[("hsa-mir-21", 99.0), ("hsa-mir-7", 1.0)]),
        ],
        RunMode::Strict,
    )
    .unwrap()
    .unwrap();

    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get(0, "mirna__hsa-mir-21"), Some(15.0));
}

#[test]
fn join_is_order_independent() {
    let reference = sorted_triples(tables());
    let permutations: [[usize; 3]; 5] = [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    for order in permutations {
        let mut source = tables().into_iter().map(Some).collect::<Vec<_>>();
        let permuted = order
            .iter()
            .map(|index| source[*index].take().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(sorted_triples(permuted), reference, "order {order:?}");
    }
}

#[test]
fn join_fills_absent_cells_with_zero() {
    let joined = join_tables(tables(), RunMode::Strict).unwrap().unwrap();

    assert_eq!(joined.shape().rows, 3);
    assert_eq!(joined.shape().columns, 5);
    assert_eq!(joined.value("TCGA-AA-0001", "rppa__AKT"), Some(0.0));
    assert_eq!(joined.value("TCGA-AA-0001", "seg__7"), Some(0.0));
    assert_eq!(joined.value("TCGA-AA-0002", "mirna__hsa-mir-1"), Some(0.0));
    assert_eq!(joined.value("TCGA-AA-0002", "rppa__AKT"), Some(2.5));
    assert_eq!(joined.value("TCGA-AA-0003", "seg__7"), Some(0.25));
    assert_eq!(joined.index_name(), "sample_id");
}

#[test]
fn mirna_only_sample_is_zero_elsewhere() {
    let joined = join_tables(tables(), RunMode::Strict).unwrap().unwrap();
    for column in joined.columns() {
        if !column.starts_with("mirna__") {
            assert_eq!(joined.value("TCGA-AA-0001", column), Some(0.0), "{column}");
        }
    }
}

#[test]
fn nothing_to_join() {
    let err = join_tables(Vec::new(), RunMode::Strict).unwrap_err();
    assert_matches!(err, ConsolidateError::NoData);
    assert!(join_tables(Vec::new(), RunMode::Lenient).unwrap().is_none());
}

#[test]
fn consolidate_empty_rows() {
    let err = consolidate(AssayRows::new(), RunMode::Strict).unwrap_err();
    assert_matches!(err, ConsolidateError::NoData);
    assert!(consolidate(AssayRows::new(), RunMode::Lenient).unwrap().is_none());
}
