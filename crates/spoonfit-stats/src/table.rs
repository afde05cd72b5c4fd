//! Loading measurement records from delimited files.

use spoonfit_tiers::{ClassifyError, validate};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Default name of the measurement column.
pub const DEFAULT_VALUE_COLUMN: &str = "diameter_mm";

/// Default name of the record identifier column.
pub const DEFAULT_ID_COLUMN: &str = "subject_id";

/// Default name of the grouping column.
pub const DEFAULT_GROUP_COLUMN: &str = "ethnicity";

/// Errors that make a whole table unusable.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read table {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("table {path:?} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
}

/// Which columns carry the measurement, the identifier and the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub value_column: String,
    pub id_column: String,
    pub group_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            group_column: DEFAULT_GROUP_COLUMN.to_string(),
        }
    }
}

/// A row whose measurement parsed and passed the plausibility gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub value: f64,
    /// Every column of the row, keyed by header name.
    pub attributes: BTreeMap<String, String>,
}

impl Record {
    /// Non-empty value of `column`.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes
            .get(column)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// Why a row did not make it into the table.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The row is missing the measurement or identifier field.
    Malformed(String),
    /// The measurement is not a number.
    NotNumeric(String),
    /// The measurement is a number outside the plausible range.
    Implausible(ClassifyError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed row: {}", msg),
            Self::NotNumeric(raw) => write!(f, "not a number: {:?}", raw),
            Self::Implausible(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub id: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Valid(Record),
    Skipped(SkippedRow),
}

/// Read every data row of a CSV file, keeping the outcome of each one.
///
/// Only an unreadable file or a header without the value/id columns is an
/// error. Bad rows are returned as [`RowOutcome::Skipped`].
pub fn read_rows(path: &Path, schema: &TableSchema) -> Result<Vec<RowOutcome>, TableError> {
    let read_err = |source: csv::Error| TableError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers = reader.headers().map_err(read_err)?.clone();
    let column_index = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| TableError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };
    let value_idx = column_index(&schema.value_column)?;
    let id_idx = column_index(&schema.id_column)?;

    let mut outcomes = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header occupies line 1
        let fallback_line = idx as u64 + 2;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                outcomes.push(RowOutcome::Skipped(SkippedRow {
                    line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
                    id: None,
                    reason: SkipReason::Malformed(e.to_string()),
                }));
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(fallback_line);
        let id = row.get(id_idx).map(|s| s.to_string());

        let Some(raw_value) = row.get(value_idx) else {
            outcomes.push(RowOutcome::Skipped(SkippedRow {
                line,
                id,
                reason: SkipReason::Malformed(format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    row.len()
                )),
            }));
            continue;
        };

        let value = match raw_value.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                outcomes.push(RowOutcome::Skipped(SkippedRow {
                    line,
                    id,
                    reason: SkipReason::NotNumeric(raw_value.to_string()),
                }));
                continue;
            }
        };

        if let Err(e) = validate(value) {
            outcomes.push(RowOutcome::Skipped(SkippedRow {
                line,
                id,
                reason: SkipReason::Implausible(e),
            }));
            continue;
        }

        let Some(id) = id else {
            outcomes.push(RowOutcome::Skipped(SkippedRow {
                line,
                id: None,
                reason: SkipReason::Malformed("missing identifier".to_string()),
            }));
            continue;
        };

        let attributes = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();

        outcomes.push(RowOutcome::Valid(Record {
            id,
            value,
            attributes,
        }));
    }

    Ok(outcomes)
}

/// The cleaned set of valid records from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a CSV file, silently dropping rows that fail to parse or validate.
    pub fn load(path: &Path, schema: &TableSchema) -> Result<Self, TableError> {
        let mut records = Vec::new();
        let mut dropped = 0usize;

        for outcome in read_rows(path, schema)? {
            match outcome {
                RowOutcome::Valid(record) => records.push(record),
                RowOutcome::Skipped(skipped) => {
                    debug!(line = skipped.line, reason = %skipped.reason, "Dropping row");
                    dropped += 1;
                }
            }
        }

        info!(
            path = ?path,
            rows = records.len(),
            dropped,
            "Loaded measurement table"
        );
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Measurements keyed by the non-empty value of `group_key`, groups sorted by name.
    pub fn group_values(&self, group_key: &str) -> BTreeMap<String, Vec<f64>> {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in &self.records {
            if let Some(group) = record.attribute(group_key) {
                groups.entry(group.to_string()).or_default().push(record.value);
            }
        }
        groups
    }
}
