use camino::Utf8Path;
use tracing::debug;

use crate::domain::AssayKind;
use crate::error::ConsolidateError;
use crate::parsers::AssayParser;
use crate::parsers::delimited::{DelimitedTable, GroupedValues};
use crate::sample_id::extract_sample_id;
use crate::table::FeatureRow;

pub const CHROMOSOME_COLUMNS: [&str; 1] = ["Chromosome"];
pub const SEGMENT_MEAN_COLUMNS: [&str; 1] = ["Segment_Mean"];
pub const COPY_NUMBER_COLUMNS: [&str; 1] = ["Copy_Number"];

/// Copy-number segments summarised as the mean signal per chromosome.
///
/// `Segment_Mean` is preferred over `Copy_Number`. Files carrying neither are
/// not segmentation tables (e.g. allele-specific or gene-level downloads that
/// happen to match the name filter) and are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentationParser;

impl AssayParser for SegmentationParser {
    fn kind(&self) -> AssayKind {
        AssayKind::Segmentation
    }

    fn parse(&self, path: &Utf8Path) -> Result<Option<FeatureRow>, ConsolidateError> {
        let mut table = DelimitedTable::open(path)?;
        let Some(metric_column) = table
            .column(&SEGMENT_MEAN_COLUMNS)
            .or_else(|| table.column(&COPY_NUMBER_COLUMNS))
        else {
            debug!("{path}: no segment mean or copy number column, skipping");
            return Ok(None);
        };
        let chromosome_column = table.require(&CHROMOSOME_COLUMNS)?;

        let mut grouped = GroupedValues::new();
        table.for_each_pair(chromosome_column, metric_column, |chromosome, value| {
            grouped.record(normalize_chromosome(chromosome), value)
        })?;

        Ok(Some(FeatureRow::from_raw(
            extract_sample_id(path),
            AssayKind::Segmentation,
            grouped.into_means(),
        )))
    }
}

/// `chr7` and `7` name the same chromosome.
pub fn normalize_chromosome(label: &str) -> &str {
    label.strip_prefix("chr").unwrap_or(label)
}
