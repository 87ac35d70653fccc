use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConsolidateError;
use crate::sample_id::normalize_barcode;

/// Separator between the assay tag and the raw feature name in output columns.
pub const COLUMN_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SampleId(String);

impl SampleId {
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-applies barcode canonicalization; a no-op for ids that are already canonical.
    pub fn canonicalize(self) -> Self {
        let normalized = normalize_barcode(&self.0);
        if normalized == self.0 {
            self
        } else {
            Self(normalized)
        }
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = ConsolidateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConsolidateError::InvalidSampleId(value.to_string()));
        }
        Ok(Self(normalize_barcode(trimmed)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssayKind {
    Mirna,
    Rppa,
    Segmentation,
}

impl AssayKind {
    pub const ALL: [AssayKind; 3] = [AssayKind::Mirna, AssayKind::Rppa, AssayKind::Segmentation];

    /// Short tag used to namespace feature columns.
    pub fn tag(&self) -> &'static str {
        match self {
            AssayKind::Mirna => "mirna",
            AssayKind::Rppa => "rppa",
            AssayKind::Segmentation => "seg",
        }
    }

    pub fn column_name(&self, feature: &str) -> String {
        format!("{}{COLUMN_SEPARATOR}{feature}", self.tag())
    }

    /// Picks the assay type from a file name. Order matters: a miRNA
    /// quantification file may also contain "seg" somewhere in its name.
    pub fn classify(file_name: &str) -> Option<AssayKind> {
        let name = file_name.to_lowercase();
        if name.contains("quantification") && name.contains("mirbase21") {
            Some(AssayKind::Mirna)
        } else if name.contains("rppa") {
            Some(AssayKind::Rppa)
        } else if name.contains("seg") {
            Some(AssayKind::Segmentation)
        } else {
            None
        }
    }
}

impl fmt::Display for AssayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssayKind::Mirna => write!(f, "miRNA"),
            AssayKind::Rppa => write!(f, "RPPA"),
            AssayKind::Segmentation => write!(f, "segmentation"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Empty scans and empty merges are errors.
    #[default]
    Strict,
    /// Empty scans and empty merges end the run with nothing written.
    Lenient,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Strict => write!(f, "strict"),
            RunMode::Lenient => write!(f, "lenient"),
        }
    }
}
