use std::collections::HashMap;
use std::fs::File;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::ConsolidateError;

/// Cells read as "no measurement", the same tokens pandas treats as NA.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// `.csv` files are comma separated, everything else is tab separated.
pub fn delimiter_for(path: &Utf8Path) -> u8 {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

/// A headed delimited file opened for row-by-row reading.
pub struct DelimitedTable {
    path: Utf8PathBuf,
    headers: StringRecord,
    reader: csv::Reader<File>,
}

impl DelimitedTable {
    pub fn open(path: &Utf8Path) -> Result<Self, ConsolidateError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter_for(path))
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_path(path.as_std_path())
            .map_err(|err| csv_error(path, err))?;
        let headers = reader.headers().map_err(|err| csv_error(path, err))?.clone();
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            reader,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Index of the first header matching any alias, compared ASCII case-insensitively.
    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            self.headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(alias))
        })
    }

    pub fn require(&self, aliases: &[&str]) -> Result<usize, ConsolidateError> {
        self.column(aliases)
            .ok_or_else(|| ConsolidateError::MissingColumn {
                path: self.path.clone(),
                column: aliases.join(" | "),
            })
    }

    /// Feeds `(key, value)` from every data row to `visit`. Rows without a key
    /// are skipped; a missing value cell comes through as `None`.
    pub fn for_each_pair<F>(
        &mut self,
        key_column: usize,
        value_column: usize,
        mut visit: F,
    ) -> Result<(), ConsolidateError>
    where
        F: FnMut(&str, Option<f64>),
    {
        let mut record = StringRecord::new();
        loop {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|err| csv_error(&self.path, err))?;
            if !more {
                break;
            }
            let line = record.position().map(|pos| pos.line()).unwrap_or(0);
            let Some(key) = record.get(key_column).filter(|key| !key.is_empty()) else {
                continue;
            };
            let raw = record.get(value_column).unwrap_or("");
            let value = parse_value(&self.path, line, raw)?;
            visit(key, value);
        }
        Ok(())
    }
}

/// Parses a numeric cell. Blank and NA-style cells are missing, not errors.
pub fn parse_value(
    path: &Utf8Path,
    line: u64,
    raw: &str,
) -> Result<Option<f64>, ConsolidateError> {
    if MISSING_MARKERS.contains(&raw) {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|_| ConsolidateError::InvalidValue {
            path: path.to_path_buf(),
            line,
            value: raw.to_string(),
        })?;
    if value.is_nan() {
        return Ok(None);
    }
    Ok(Some(value))
}

fn csv_error(path: &Utf8Path, err: csv::Error) -> ConsolidateError {
    ConsolidateError::Csv {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Values grouped by key, keeping keys in first-seen order.
#[derive(Debug, Default)]
pub struct GroupedValues {
    order: Vec<String>,
    groups: HashMap<String, Group>,
}

#[derive(Debug, Clone, Copy)]
struct Group {
    first: Option<f64>,
    sum: f64,
    count: usize,
}

impl GroupedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, or only registers the key when the cell was missing.
    pub fn record(&mut self, key: &str, value: Option<f64>) {
        match value {
            Some(value) => self.add(key, value),
            None => self.touch(key),
        }
    }

    pub fn add(&mut self, key: &str, value: f64) {
        let group = self.slot(key);
        group.first.get_or_insert(value);
        group.sum += value;
        group.count += 1;
    }

    /// Registers `key` without a value so it still gets a column.
    pub fn touch(&mut self, key: &str) {
        self.slot(key);
    }

    fn slot(&mut self, key: &str) -> &mut Group {
        if !self.groups.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.groups.entry(key.to_string()).or_insert(Group {
            first: None,
            sum: 0.0,
            count: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys that received more than one value.
    pub fn repeated_keys(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|key| self.groups.get(key.as_str()).is_some_and(|g| g.count > 1))
            .map(String::as_str)
            .collect()
    }

    /// Keys that never received a value come back as `None` from every reducer.
    pub fn into_sums(self) -> Vec<(String, Option<f64>)> {
        self.finish(|group| group.sum)
    }

    pub fn into_means(self) -> Vec<(String, Option<f64>)> {
        self.finish(|group| group.sum / group.count as f64)
    }

    pub fn into_firsts(self) -> Vec<(String, Option<f64>)> {
        self.finish(|group| group.first.unwrap_or_default())
    }

    fn finish(mut self, reduce: impl Fn(&Group) -> f64) -> Vec<(String, Option<f64>)> {
        self.order
            .into_iter()
            .filter_map(|key| {
                let group = self.groups.remove(&key)?;
                let value = (group.count > 0).then(|| reduce(&group));
                Some((key, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_follows_extension() {
        assert_eq!(delimiter_for(Utf8Path::new("a/b.csv")), b',');
        assert_eq!(delimiter_for(Utf8Path::new("a/b.CSV")), b',');
        assert_eq!(delimiter_for(Utf8Path::new("a/b.tsv")), b'\t');
        assert_eq!(delimiter_for(Utf8Path::new("a/b.txt")), b'\t');
    }

    #[test]
    fn missing_markers_are_skipped() {
        let path = Utf8Path::new("x.txt");
        assert_eq!(parse_value(path, 2, "NA").unwrap(), None);
        assert_eq!(parse_value(path, 2, "").unwrap(), None);
        assert_eq!(parse_value(path, 2, "#N/A").unwrap(), None);
        assert_eq!(parse_value(path, 2, "1.5").unwrap(), Some(1.5));
        assert!(parse_value(path, 2, "abc").is_err());
    }

    #[test]
    fn grouped_values_keep_first_seen_order() {
        let mut grouped = GroupedValues::new();
        grouped.add("b", 1.0);
        grouped.add("a", 2.0);
        grouped.add("b", 3.0);
        assert_eq!(grouped.repeated_keys(), vec!["b"]);
        assert_eq!(
            grouped.into_means(),
            vec![("b".to_string(), Some(2.0)), ("a".to_string(), Some(2.0))]
        );
    }

    #[test]
    fn touched_keys_keep_their_slot() {
        let mut grouped = GroupedValues::new();
        grouped.record("a", None);
        grouped.record("b", Some(1.0));
        grouped.record("a", None);
        assert!(grouped.repeated_keys().is_empty());
        assert_eq!(
            grouped.into_sums(),
            vec![("a".to_string(), None), ("b".to_string(), Some(1.0))]
        );
    }
}
