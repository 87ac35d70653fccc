use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{info, warn};

use crate::consolidate::{AssayRows, consolidate};
use crate::domain::{AssayKind, RunMode};
use crate::error::ConsolidateError;
use crate::output::write_table_csv;
use crate::parsers::parser_for;
use crate::scanner::scan;
use crate::table::{ConsolidatedTable, FeatureRow, Shape};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
    pub pattern: String,
    pub mode: RunMode,
}

/// A file whose parse failed; the run carries on without it.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: Utf8PathBuf,
    pub kind: AssayKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CollectResult {
    pub matched: usize,
    pub ignored: usize,
    pub parsed: BTreeMap<AssayKind, usize>,
    pub not_applicable: Vec<Utf8PathBuf>,
    pub failures: Vec<FileFailure>,
    pub table: Option<ConsolidatedTable>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
    pub pattern: String,
    pub mode: RunMode,
    pub matched: usize,
    pub ignored: usize,
    pub parsed: BTreeMap<AssayKind, usize>,
    pub not_applicable: Vec<Utf8PathBuf>,
    pub failures: Vec<FileFailure>,
    pub shape: Option<Shape>,
    pub written: bool,
    pub finished_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Scan,
    /// One event per matched file; the message is its path.
    Matched,
    Merge,
    Write,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone)]
pub struct App {
    options: RunOptions,
}

impl App {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Scans, parses and consolidates without touching the output path.
    pub fn collect(&self, sink: &dyn ProgressSink) -> Result<CollectResult, ConsolidateError> {
        let started = Instant::now();
        let RunOptions {
            input,
            pattern,
            mode,
            ..
        } = &self.options;

        sink.event(ProgressEvent {
            stage: ProgressStage::Scan,
            message: format!("{input} pattern={pattern}"),
            elapsed: None,
        });
        let scanned = scan(input, pattern, *mode)?;
        for candidate in &scanned.candidates {
            sink.event(ProgressEvent {
                stage: ProgressStage::Matched,
                message: candidate.path.to_string(),
                elapsed: None,
            });
        }
        info!(
            "matched {} files ({} without an assay type)",
            scanned.matched(),
            scanned.ignored()
        );

        let mut rows = AssayRows::new();
        let mut not_applicable = Vec::new();
        let mut failures = Vec::new();
        for (path, kind) in scanned.classified() {
            match parse_file(path, kind) {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => not_applicable.push(path.to_path_buf()),
                Err(err) => {
                    warn!("failed to parse {path}: {err}");
                    failures.push(FileFailure {
                        path: path.to_path_buf(),
                        kind,
                        message: err.to_string(),
                    });
                }
            }
        }
        let parsed = AssayKind::ALL
            .into_iter()
            .map(|kind| (kind, rows.count(kind)))
            .collect::<BTreeMap<_, _>>();

        sink.event(ProgressEvent {
            stage: ProgressStage::Merge,
            message: "joining assay tables".to_string(),
            elapsed: Some(started.elapsed()),
        });
        let table = consolidate(rows, *mode)?;

        Ok(CollectResult {
            matched: scanned.matched(),
            ignored: scanned.ignored(),
            parsed,
            not_applicable,
            failures,
            table,
        })
    }

    /// Full run: collect, then write the table unless there is nothing to write.
    pub fn run(&self, sink: &dyn ProgressSink) -> Result<RunReport, ConsolidateError> {
        let started = Instant::now();
        let result = self.collect(sink)?;
        let output = &self.options.output;

        let (shape, written) = match &result.table {
            Some(table) => {
                sink.event(ProgressEvent {
                    stage: ProgressStage::Write,
                    message: output.to_string(),
                    elapsed: Some(started.elapsed()),
                });
                write_table_csv(table, output)?;
                let shape = table.shape();
                info!("wrote {} x {} table to {output}", shape.rows, shape.columns);
                (Some(shape), true)
            }
            None => {
                info!("no data parsed, nothing written");
                (None, false)
            }
        };

        Ok(RunReport {
            input: self.options.input.clone(),
            output: resolve_output(output),
            pattern: self.options.pattern.clone(),
            mode: self.options.mode,
            matched: result.matched,
            ignored: result.ignored,
            parsed: result.parsed,
            not_applicable: result.not_applicable,
            failures: result.failures,
            shape,
            written,
            finished_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

fn parse_file(path: &Utf8Path, kind: AssayKind) -> Result<Option<FeatureRow>, ConsolidateError> {
    parser_for(kind).parse(path)
}

fn resolve_output(output: &Utf8Path) -> Utf8PathBuf {
    output
        .canonicalize_utf8()
        .unwrap_or_else(|_| output.to_path_buf())
}
