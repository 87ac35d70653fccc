//! Per-assay merging and the cross-assay outer join.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::domain::{AssayKind, RunMode, SampleId};
use crate::error::ConsolidateError;
use crate::table::{AssayTable, ConsolidatedTable, FeatureRow};

/// Value written for a feature the sample has no measurement for.
pub const MISSING_VALUE: f64 = 0.0;

/// Parsed rows waiting to be merged, grouped by assay type in scan order.
#[derive(Debug, Default)]
pub struct AssayRows {
    rows: BTreeMap<AssayKind, Vec<FeatureRow>>,
}

impl AssayRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: FeatureRow) {
        self.rows.entry(row.kind).or_default().push(row);
    }

    pub fn count(&self, kind: AssayKind) -> usize {
        self.rows.get(&kind).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(Vec::is_empty)
    }

    pub fn take(&mut self, kind: AssayKind) -> Vec<FeatureRow> {
        self.rows.remove(&kind).unwrap_or_default()
    }
}

/// Stacks the single-row results of one assay type into one table.
///
/// Columns are the union of every file's features. When two files resolve to
/// the same sample, the one met first in scan order is kept. Returns `None`
/// for an empty input.
pub fn merge_assay(
    kind: AssayKind,
    rows: Vec<FeatureRow>,
    mode: RunMode,
) -> Result<Option<AssayTable>, ConsolidateError> {
    if rows.is_empty() {
        return Ok(None);
    }
    let inputs = rows.len();
    report_shared_columns(kind, &rows);

    let mut seen = HashSet::new();
    let mut table = AssayTable::new(kind);
    for row in rows {
        if !seen.insert(row.sample_id.clone()) {
            warn!("duplicate {kind} sample {}, keeping first occurrence", row.sample_id);
            continue;
        }
        table.push_row(row);
    }

    if table.is_empty() {
        return match mode {
            RunMode::Strict => Err(ConsolidateError::EmptyMerge(kind)),
            RunMode::Lenient => {
                warn!("{kind} merge produced 0 rows, dropping it");
                Ok(None)
            }
        };
    }

    info!(
        "{kind}: {} samples x {} features from {inputs} files",
        table.row_count(),
        table.columns().len()
    );
    Ok(Some(table))
}

fn report_shared_columns(kind: AssayKind, rows: &[FeatureRow]) {
    let mut counts = HashMap::<&str, usize>::new();
    for row in rows {
        for (name, _) in &row.features {
            *counts.entry(name.as_str()).or_default() += 1;
        }
    }
    let shared = counts.values().filter(|count| **count > 1).count();
    if shared > 0 {
        debug!("{kind}: {shared} feature columns appear in more than one file");
    }
}

/// Full outer join of per-assay tables on sample id.
///
/// Samples keep their first appearance order and columns are concatenated
/// table by table, both following `AssayKind` order so the result does not
/// depend on the order the tables are handed in. Cells a table does not
/// cover are filled with [`MISSING_VALUE`].
pub fn join_tables(
    mut tables: Vec<AssayTable>,
    mode: RunMode,
) -> Result<Option<ConsolidatedTable>, ConsolidateError> {
    if tables.is_empty() {
        return match mode {
            RunMode::Strict => Err(ConsolidateError::NoData),
            RunMode::Lenient => Ok(None),
        };
    }
    tables.sort_by_key(AssayTable::kind);

    let mut columns = Vec::new();
    let mut samples: Vec<SampleId> = Vec::new();
    let mut sample_index = HashMap::<SampleId, usize>::new();
    let mut values: Vec<Vec<f64>> = Vec::new();

    for table in tables {
        let offset = columns.len();
        let (table_columns, table_samples, cells) = table.into_parts();
        let width = table_columns.len();
        columns.extend(table_columns);
        for row in &mut values {
            row.resize(offset + width, MISSING_VALUE);
        }

        for (sample, row_cells) in table_samples.into_iter().zip(cells) {
            let sample = sample.canonicalize();
            let index = match sample_index.get(&sample) {
                Some(index) => *index,
                None => {
                    let index = samples.len();
                    sample_index.insert(sample.clone(), index);
                    samples.push(sample);
                    values.push(vec![MISSING_VALUE; offset + width]);
                    index
                }
            };
            for (position, cell) in row_cells.into_iter().enumerate() {
                if let Some(value) = cell {
                    values[index][offset + position] = value;
                }
            }
        }
    }

    Ok(Some(ConsolidatedTable::from_parts(columns, samples, values)))
}

/// Runs the per-assay merge for every kind, then the cross-assay join.
pub fn consolidate(
    mut rows: AssayRows,
    mode: RunMode,
) -> Result<Option<ConsolidatedTable>, ConsolidateError> {
    let mut tables = Vec::new();
    for kind in AssayKind::ALL {
        if let Some(table) = merge_assay(kind, rows.take(kind), mode)? {
            tables.push(table);
        }
    }
    join_tables(tables, mode)
}
