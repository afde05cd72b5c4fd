//! Classify every row of a measurement table

use anyhow::{Context, Result};
use spoonfit_stats::{RowOutcome, TableSchema, read_rows};
use spoonfit_tiers::Classifier;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Row counts for one run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClassifyCounts {
    pub classified: usize,
    pub skipped: usize,
}

pub async fn classify(
    file: &Path,
    locale: &str,
    schema: &TableSchema,
    classifier: &Classifier,
) -> Result<()> {
    if !classifier.tiers().locales().iter().any(|l| l == locale) {
        warn!(
            locale,
            available = ?classifier.tiers().locales(),
            "Locale is not declared by every tier"
        );
    }

    let outcomes = read_rows(file, schema)?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let counts = write_classifications(
        &outcomes,
        locale,
        &schema.group_column,
        classifier,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .context("Failed to write results")?;

    info!(
        classified = counts.classified,
        skipped = counts.skipped,
        "Classification complete"
    );

    Ok(())
}

/// Print one line per classified row to `out` and one skip notice per rejected row to `err`.
pub fn write_classifications(
    outcomes: &[RowOutcome],
    locale: &str,
    group_column: &str,
    classifier: &Classifier,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<ClassifyCounts> {
    let mut counts = ClassifyCounts::default();

    for outcome in outcomes {
        match outcome {
            RowOutcome::Valid(record) => match classifier.classify(record.value, locale) {
                Ok(label) => {
                    let group = record.attribute(group_column).unwrap_or("-");
                    writeln!(
                        out,
                        "{} ({}): {} mm → {}",
                        record.id, group, record.value, label
                    )?;
                    counts.classified += 1;
                }
                Err(e) => {
                    writeln!(err, "Skipping {}: {}", record.id, e)?;
                    counts.skipped += 1;
                }
            },
            RowOutcome::Skipped(skipped) => {
                let id = skipped.id.as_deref().unwrap_or("?");
                writeln!(
                    err,
                    "Skipping line {} ({}): {}",
                    skipped.line, id, skipped.reason
                )?;
                counts.skipped += 1;
            }
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spoonfit_tiers::TierTable;

    fn run(csv: &str, locale: &str) -> (String, String, ClassifyCounts) {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let schema = TableSchema::default();
        let outcomes = read_rows(file.path(), &schema).unwrap();
        let classifier = Classifier::without_audit(TierTable::builtin().unwrap());

        let mut out = Vec::new();
        let mut err = Vec::new();
        let counts = write_classifications(
            &outcomes,
            locale,
            &schema.group_column,
            &classifier,
            &mut out,
            &mut err,
        )
        .unwrap();

        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            counts,
        )
    }

    #[test]
    fn test_prints_valid_rows_and_skips_invalid() {
        let (out, err, counts) = run(
            "subject_id,diameter_mm,ethnicity\n\
             s1,5,Andean\n\
             s2,12.5,Mestizo\n\
             s3,oops,Andean\n\
             s4,700,Andean\n\
             s5,25,\n",
            "en",
        );

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "s1 (Andean): 5 mm → Mini spoon (8 mm)",
                "s2 (Mestizo): 12.5 mm → Small spoon (12 mm)",
                "s5 (-): 25 mm → Large spoon (20 mm)",
            ]
        );

        let notices: Vec<&str> = err.lines().collect();
        assert_eq!(notices.len(), 2);
        assert!(notices[0].starts_with("Skipping line 4 (s3): not a number"));
        assert!(notices[1].starts_with("Skipping line 5 (s4):"));

        assert_eq!(
            counts,
            ClassifyCounts {
                classified: 3,
                skipped: 2
            }
        );
    }

    #[test]
    fn test_spanish_labels() {
        let (out, _, _) = run("subject_id,diameter_mm,ethnicity\nx,17,Q\n", "es");
        assert_eq!(out.trim(), "x (Q): 17 mm → Cuchara mediana (16 mm)");
    }

    #[test]
    fn test_unknown_locale_skips_each_row() {
        let (out, err, counts) = run("subject_id,diameter_mm,ethnicity\nx,17,Q\ny,3,Q\n", "fr");
        assert!(out.is_empty());
        assert_eq!(err.lines().count(), 2);
        assert!(err.contains("no label for locale 'fr'"));
        assert_eq!(counts.skipped, 2);
    }
}
