use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

use crate::domain::AssayKind;

#[derive(Debug, Error, Diagnostic)]
pub enum ConsolidateError {
    #[error("data directory not found: {0}")]
    #[diagnostic(help("pass an existing download directory with --input"))]
    DirectoryNotFound(Utf8PathBuf),

    #[error("no files matched pattern '{pattern}' in {root}")]
    NoMatch { pattern: String, root: Utf8PathBuf },

    #[error("invalid sample id: {0:?}")]
    InvalidSampleId(String),

    #[error("invalid file pattern: {0}")]
    InvalidPattern(String),

    #[error("{path}: missing required column {column}")]
    MissingColumn { path: Utf8PathBuf, column: String },

    #[error("{path}: invalid numeric value '{value}' at line {line}")]
    InvalidValue {
        path: Utf8PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path}: malformed table: {message}")]
    Csv { path: Utf8PathBuf, message: String },

    #[error("{0} merge produced 0 rows")]
    EmptyMerge(AssayKind),

    #[error("no data parsed from matched files")]
    NoData,

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ConsolidateError {
    /// Errors raised because a run had nothing to consolidate.
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            ConsolidateError::NoMatch { .. }
                | ConsolidateError::EmptyMerge(_)
                | ConsolidateError::NoData
        )
    }
}
