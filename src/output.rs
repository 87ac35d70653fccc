use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, ProgressStage, RunReport};
use crate::error::ConsolidateError;
use crate::table::ConsolidatedTable;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

/// Writes the table as CSV with `sample_id` as the first column.
///
/// The file is written next to its destination and renamed into place, so a
/// failed run never leaves a truncated table behind.
pub fn write_table_csv(table: &ConsolidatedTable, path: &Utf8Path) -> Result<(), ConsolidateError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| ConsolidateError::Filesystem(err.to_string()))?;
    let temp = tempfile::Builder::new()
        .prefix("gdc-consolidate")
        .suffix(".csv.tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| ConsolidateError::Filesystem(err.to_string()))?;

    {
        let mut writer = csv::Writer::from_writer(temp.as_file());
        let mut header = Vec::with_capacity(table.columns().len() + 1);
        header.push(table.index_name());
        header.extend(table.columns().iter().map(String::as_str));
        writer
            .write_record(&header)
            .map_err(|err| ConsolidateError::Filesystem(err.to_string()))?;

        let mut record = Vec::with_capacity(header.len());
        for (sample, values) in table.rows() {
            record.clear();
            record.push(sample.to_string());
            record.extend(values.iter().map(|value| value.to_string()));
            writer
                .write_record(&record)
                .map_err(|err| ConsolidateError::Filesystem(err.to_string()))?;
        }
        writer
            .flush()
            .map_err(|err| ConsolidateError::Filesystem(err.to_string()))?;
    }

    temp.persist(path.as_std_path())
        .map_err(|err| ConsolidateError::Filesystem(err.to_string()))?;
    Ok(())
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &RunReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Line-oriented progress for terminals: lists every matched file.
pub struct TextOutput;

impl TextOutput {
    pub fn print_report(report: &RunReport) {
        for failure in &report.failures {
            println!("Failed to parse {}: {}", failure.path, failure.message);
        }
        match report.shape {
            Some(shape) if report.written => {
                println!("Final shape: ({}, {})", shape.rows, shape.columns);
                println!("Consolidated data written to {}", report.output);
            }
            _ => println!("No data parsed from matched files; nothing written"),
        }
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        match event.stage {
            ProgressStage::Scan => println!("Matched files:"),
            ProgressStage::Matched => println!(" - {}", event.message),
            ProgressStage::Merge | ProgressStage::Write => {}
        }
    }
}
