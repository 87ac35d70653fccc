use camino::Utf8Path;
use tracing::debug;

use crate::domain::AssayKind;
use crate::error::ConsolidateError;
use crate::parsers::AssayParser;
use crate::parsers::delimited::{DelimitedTable, GroupedValues};
use crate::sample_id::extract_sample_id;
use crate::table::FeatureRow;

pub const MIRNA_ID_COLUMNS: [&str; 1] = ["miRNA_ID"];

/// Historical spellings of the reads-per-million column, in preference order.
pub const RPM_COLUMNS: [&str; 3] = [
    "reads_per_million_miRNA_mapped",
    "reads_per_million_miRNA",
    "reads_per_million",
];

/// miRNA quantification (`*.mirbase21.*quantification*`). Isoform rows that
/// share a miRNA id are summed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirnaParser;

impl AssayParser for MirnaParser {
    fn kind(&self) -> AssayKind {
        AssayKind::Mirna
    }

    fn parse(&self, path: &Utf8Path) -> Result<Option<FeatureRow>, ConsolidateError> {
        let mut table = DelimitedTable::open(path)?;
        let id_column = table.require(&MIRNA_ID_COLUMNS)?;
        let rpm_column = table.require(&RPM_COLUMNS)?;

        let mut grouped = GroupedValues::new();
        table.for_each_pair(id_column, rpm_column, |id, rpm| grouped.record(id, rpm))?;

        let repeated = grouped.repeated_keys();
        if !repeated.is_empty() {
            debug!(
                "{}: summed {} miRNA ids with several rows",
                table.path(),
                repeated.len()
            );
        }

        Ok(Some(FeatureRow::from_raw(
            extract_sample_id(path),
            AssayKind::Mirna,
            grouped.into_sums(),
        )))
    }
}
