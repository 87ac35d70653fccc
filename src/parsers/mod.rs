use camino::Utf8Path;

use crate::domain::AssayKind;
use crate::error::ConsolidateError;
use crate::table::FeatureRow;

pub mod delimited;
pub mod mirna;
pub mod rppa;
pub mod segmentation;

pub use mirna::MirnaParser;
pub use rppa::RppaParser;
pub use segmentation::SegmentationParser;

/// Turns one downloaded assay file into a single wide row for its sample.
pub trait AssayParser {
    fn kind(&self) -> AssayKind;

    /// `Ok(None)` means the file is not applicable and should be skipped
    /// without reporting a failure.
    fn parse(&self, path: &Utf8Path) -> Result<Option<FeatureRow>, ConsolidateError>;
}

pub fn parser_for(kind: AssayKind) -> &'static dyn AssayParser {
    match kind {
        AssayKind::Mirna => &MirnaParser,
        AssayKind::Rppa => &RppaParser,
        AssayKind::Segmentation => &SegmentationParser,
    }
}
