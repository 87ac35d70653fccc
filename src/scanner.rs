use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobMatcher};
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::{AssayKind, RunMode};
use crate::error::ConsolidateError;

/// Extensions of the delimited text files GDC ships.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["txt", "tsv", "csv"];

pub const DEFAULT_PATTERN: &str = "*";

#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub path: Utf8PathBuf,
    pub kind: Option<AssayKind>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub candidates: Vec<Candidate>,
}

impl ScanResult {
    pub fn matched(&self) -> usize {
        self.candidates.len()
    }

    pub fn ignored(&self) -> usize {
        self.candidates
            .iter()
            .filter(|candidate| candidate.kind.is_none())
            .count()
    }

    pub fn classified(&self) -> impl Iterator<Item = (&Utf8Path, AssayKind)> {
        self.candidates
            .iter()
            .filter_map(|candidate| Some((candidate.path.as_path(), candidate.kind?)))
    }
}

/// Recursively collects delimited files under `root` whose name matches
/// `pattern`, classified by assay type. Paths are sorted so the scan order,
/// and therefore first-wins deduplication, is reproducible.
pub fn scan(root: &Utf8Path, pattern: &str, mode: RunMode) -> Result<ScanResult, ConsolidateError> {
    if !root.as_std_path().is_dir() {
        return Err(ConsolidateError::DirectoryNotFound(root.to_path_buf()));
    }
    let matcher = compile_pattern(pattern)?;

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root.as_std_path()) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {root}: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
            warn!("skipping non UTF-8 path under {root}");
            continue;
        };
        if !has_allowed_extension(&path) {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        if !matcher.is_match(name) {
            continue;
        }
        let kind = AssayKind::classify(name);
        match kind {
            Some(kind) => debug!("matched {path} as {kind}"),
            None => debug!("matched {path}, no assay type in name"),
        }
        candidates.push(Candidate { path, kind });
    }
    candidates.sort_by(|a, b| a.path.cmp(&b.path));

    if candidates.is_empty() && mode == RunMode::Strict {
        return Err(ConsolidateError::NoMatch {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
        });
    }
    Ok(ScanResult { candidates })
}

pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher, ConsolidateError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|err| ConsolidateError::InvalidPattern(err.to_string()))
}

fn has_allowed_extension(path: &Utf8Path) -> bool {
    path.extension()
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
