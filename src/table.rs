use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{AssayKind, SampleId};

/// Name of the row key column in the consolidated output.
pub const SAMPLE_ID_COLUMN: &str = "sample_id";

/// One parsed assay file: a single sample with its namespaced feature values.
///
/// A feature whose cells were all missing is kept with a `None` value so it
/// still becomes a column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub sample_id: SampleId,
    pub kind: AssayKind,
    pub features: Vec<(String, Option<f64>)>,
}

impl FeatureRow {
    /// Builds a row from raw feature names, prefixing each with the assay tag.
    pub fn from_raw<V>(sample_id: SampleId, kind: AssayKind, raw: Vec<(String, V)>) -> Self
    where
        V: Into<Option<f64>>,
    {
        let features = raw
            .into_iter()
            .map(|(name, value)| (kind.column_name(&name), value.into()))
            .collect();
        Self {
            sample_id,
            kind,
            features,
        }
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| *value)
    }
}

/// Per-assay table: rows keyed by sample, cells undefined until the cross-type join.
#[derive(Debug, Clone)]
pub struct AssayTable {
    kind: AssayKind,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    samples: Vec<SampleId>,
    cells: Vec<Vec<Option<f64>>>,
}

impl AssayTable {
    pub fn new(kind: AssayKind) -> Self {
        Self {
            kind,
            columns: Vec::new(),
            column_index: HashMap::new(),
            samples: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn kind(&self) -> AssayKind {
        self.kind
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn samples(&self) -> &[SampleId] {
        &self.samples
    }

    pub fn row_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends a row, widening the column set as needed. The caller is
    /// responsible for sample uniqueness.
    pub fn push_row(&mut self, row: FeatureRow) {
        let mut cells = vec![None; self.columns.len()];
        for (name, value) in row.features {
            let index = match self.column_index.get(&name) {
                Some(index) => *index,
                None => {
                    let index = self.columns.len();
                    self.column_index.insert(name.clone(), index);
                    self.columns.push(name);
                    for existing in &mut self.cells {
                        existing.push(None);
                    }
                    cells.push(None);
                    index
                }
            };
            cells[index] = value;
        }
        self.samples.push(row.sample_id);
        self.cells.push(cells);
    }

    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        let index = *self.column_index.get(column)?;
        self.cells.get(row)?.get(index).copied().flatten()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<SampleId>, Vec<Vec<Option<f64>>>) {
        (self.columns, self.samples, self.cells)
    }
}

/// Final sample-by-feature matrix with every cell filled.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedTable {
    columns: Vec<String>,
    samples: Vec<SampleId>,
    values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl ConsolidatedTable {
    pub(crate) fn from_parts(
        columns: Vec<String>,
        samples: Vec<SampleId>,
        values: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            columns,
            samples,
            values,
        }
    }

    pub fn index_name(&self) -> &'static str {
        SAMPLE_ID_COLUMN
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn samples(&self) -> &[SampleId] {
        &self.samples
    }

    pub fn shape(&self) -> Shape {
        Shape {
            rows: self.samples.len(),
            columns: self.columns.len(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (&SampleId, &[f64])> {
        self.samples
            .iter()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn value(&self, sample: &str, column: &str) -> Option<f64> {
        let row = self.samples.iter().position(|id| id.as_str() == sample)?;
        let col = self.columns.iter().position(|name| name == column)?;
        Some(self.values[row][col])
    }

    /// Every cell as `(sample, column, value)`, in row-major order.
    pub fn triples(&self) -> Vec<(String, String, f64)> {
        self.rows()
            .flat_map(|(sample, values)| {
                self.columns
                    .iter()
                    .zip(values.iter())
                    .map(move |(column, value)| (sample.to_string(), column.clone(), *value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_row_widens_columns() {
        let mut table = AssayTable::new(AssayKind::Rppa);
        table.push_row(FeatureRow::from_raw(
            "TCGA-AA-0001".parse().unwrap(),
            AssayKind::Rppa,
            vec![("AKT".to_string(), 1.0)],
        ));
        table.push_row(FeatureRow::from_raw(
            "TCGA-AA-0002".parse().unwrap(),
            AssayKind::Rppa,
            vec![("MTOR".to_string(), 2.0)],
        ));

        assert_eq!(table.columns(), ["rppa__AKT", "rppa__MTOR"]);
        assert_eq!(table.get(0, "rppa__AKT"), Some(1.0));
        assert_eq!(table.get(0, "rppa__MTOR"), None);
        assert_eq!(table.get(1, "rppa__MTOR"), Some(2.0));
    }

    #[test]
    fn valueless_feature_still_gets_a_column() {
        let mut table = AssayTable::new(AssayKind::Rppa);
        table.push_row(FeatureRow::from_raw(
            "TCGA-AA-0001".parse().unwrap(),
            AssayKind::Rppa,
            vec![("AKT".to_string(), None), ("BAX".to_string(), Some(1.0))],
        ));

        assert_eq!(table.columns(), ["rppa__AKT", "rppa__BAX"]);
        assert_eq!(table.get(0, "rppa__AKT"), None);
    }
}
