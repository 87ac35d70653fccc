use camino::Utf8Path;
use tracing::debug;

use crate::domain::AssayKind;
use crate::error::ConsolidateError;
use crate::parsers::AssayParser;
use crate::parsers::delimited::{DelimitedTable, GroupedValues};
use crate::sample_id::extract_sample_id;
use crate::table::FeatureRow;

pub const TARGET_COLUMNS: [&str; 1] = ["peptide_target"];
pub const EXPRESSION_COLUMNS: [&str; 1] = ["protein_expression"];

/// Reverse-phase protein array readout, one value per peptide target.
/// A target listed twice keeps its first value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RppaParser;

impl AssayParser for RppaParser {
    fn kind(&self) -> AssayKind {
        AssayKind::Rppa
    }

    fn parse(&self, path: &Utf8Path) -> Result<Option<FeatureRow>, ConsolidateError> {
        let mut table = DelimitedTable::open(path)?;
        let target_column = table.require(&TARGET_COLUMNS)?;
        let expression_column = table.require(&EXPRESSION_COLUMNS)?;

        let mut grouped = GroupedValues::new();
        table.for_each_pair(target_column, expression_column, |target, value| {
            grouped.record(target, value)
        })?;

        for target in grouped.repeated_keys() {
            debug!("{}: duplicate peptide target {target}, keeping first", table.path());
        }

        Ok(Some(FeatureRow::from_raw(
            extract_sample_id(path),
            AssayKind::Rppa,
            grouped.into_firsts(),
        )))
    }
}
