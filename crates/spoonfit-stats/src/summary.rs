//! Descriptive statistics per group.

use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics for the valid measurements of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of measurements.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// Sample standard deviation (n - 1). `None` for a single measurement.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// 25th percentile (first quartile).
    pub q1: f64,
    /// 75th percentile (third quartile).
    pub q3: f64,
}

impl GroupSummary {
    /// Compute statistics from a slice of measurements.
    ///
    /// Returns `None` if the input is empty.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = sorted.iter().sum::<f64>() / count as f64;

        let std_dev = if count > 1 {
            let variance =
                sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(variance.sqrt())
        } else {
            None
        };

        Some(Self {
            count,
            mean,
            median: percentile(&sorted, 50.0),
            std_dev,
            min: sorted[0],
            max: sorted[count - 1],
            q1: percentile(&sorted, 25.0),
            q3: percentile(&sorted, 75.0),
        })
    }

    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Percentile of a sorted slice, linearly interpolated between neighbours.
///
/// `p` should be between 0 and 100.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    if sorted.len() == 1 {
        return sorted[0];
    }

    let p = p.clamp(0.0, 100.0);
    let index = (p / 100.0) * (sorted.len() as f64 - 1.0);

    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let fraction = index - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// Group the table by `group_key` and summarize each group.
///
/// Records without a value for `group_key` are left out, so are groups with
/// no records.
pub fn summarize(table: &Table, group_key: &str) -> BTreeMap<String, GroupSummary> {
    table
        .group_values(group_key)
        .into_iter()
        .filter_map(|(group, values)| GroupSummary::compute(&values).map(|s| (group, s)))
        .collect()
}

/// Render summaries as a text table, one group per line.
pub fn format_summary(group_key: &str, summaries: &BTreeMap<String, GroupSummary>) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Measurements by {}", group_key));
    lines.push("=".repeat(72));

    if summaries.is_empty() {
        lines.push("  (no valid measurements)".to_string());
        return lines.join("\n");
    }

    let width = summaries
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
        .max(group_key.chars().count());

    lines.push(format!(
        "{:<width$}  {:>6}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        group_key, "count", "mean", "median", "std", "min", "max"
    ));
    for (group, s) in summaries {
        let std = s
            .std_dev
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<width$}  {:>6}  {:>8.2}  {:>8.2}  {:>8}  {:>8.2}  {:>8.2}",
            group, s.count, s.mean, s.median, std, s.min, s.max
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Record, TableSchema};
    use std::io::Write;

    fn record(id: &str, value: f64, group: &str) -> Record {
        Record {
            id: id.to_string(),
            value,
            attributes: BTreeMap::from([("ethnicity".to_string(), group.to_string())]),
        }
    }

    #[test]
    fn test_compute_empty() {
        assert!(GroupSummary::compute(&[]).is_none());
    }

    #[test]
    fn test_compute_single() {
        let s = GroupSummary::compute(&[14.0]).unwrap();
        assert_eq!(s.count, 1);
        assert!((s.mean - 14.0).abs() < 1e-9);
        assert!((s.median - 14.0).abs() < 1e-9);
        assert!(s.std_dev.is_none());
    }

    #[test]
    fn test_compute_basic() {
        let s = GroupSummary::compute(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(s.count, 5);
        assert!((s.mean - 3.0).abs() < 1e-9);
        assert!((s.median - 3.0).abs() < 1e-9);
        assert!((s.min - 1.0).abs() < 1e-9);
        assert!((s.max - 5.0).abs() < 1e-9);
        assert!((s.q1 - 2.0).abs() < 1e-9);
        assert!((s.q3 - 4.0).abs() < 1e-9);
        assert!((s.iqr() - 2.0).abs() < 1e-9);
        // Sample variance of 1..=5 is 2.5
        assert!((s.std_dev.unwrap() - 2.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_median_even_count() {
        let s = GroupSummary::compute(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert!((s.median - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_std_dev_constant() {
        let s = GroupSummary::compute(&[7.0, 7.0, 7.0]).unwrap();
        assert!(s.std_dev.unwrap() < 1e-12);
    }

    #[test]
    fn test_summarize_groups() {
        let table = Table::from_records(vec![
            record("a", 10.0, "X"),
            record("b", 12.0, "X"),
            record("c", 20.0, "Y"),
            record("d", 30.0, ""),
        ]);
        let summaries = summarize(&table, "ethnicity");

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries["X"].count, 2);
        assert!((summaries["X"].mean - 11.0).abs() < 1e-9);
        assert_eq!(summaries["Y"].count, 1);
        assert!(summarize(&table, "site").is_empty());
    }

    #[test]
    fn test_summarize_excludes_non_numeric_row() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(
            b"subject_id,diameter_mm,ethnicity\n\
              s1,11,A\n\
              s2,n/a,A\n\
              s3,13,A\n\
              s4,15,A\n",
        )
        .unwrap();

        let table = Table::load(file.path(), &TableSchema::default()).unwrap();
        let summaries = summarize(&table, "ethnicity");

        assert_eq!(summaries.len(), 1);
        let a = &summaries["A"];
        assert_eq!(a.count, 3);
        assert!((a.mean - 13.0).abs() < 1e-9);
        assert!((a.median - 13.0).abs() < 1e-9);
        assert!((a.std_dev.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_summary() {
        let table = Table::from_records(vec![
            record("a", 10.0, "X"),
            record("b", 12.0, "X"),
            record("c", 20.0, "Y"),
        ]);
        let text = format_summary("ethnicity", &summarize(&table, "ethnicity"));

        assert!(text.starts_with("Measurements by ethnicity"));
        assert!(text.contains("11.00"));
        // Single-row group has no sample deviation
        let y_line = text.lines().find(|l| l.starts_with('Y')).unwrap();
        assert!(y_line.contains(" - "));

        let empty = format_summary("ethnicity", &BTreeMap::new());
        assert!(empty.contains("(no valid measurements)"));
    }
}
