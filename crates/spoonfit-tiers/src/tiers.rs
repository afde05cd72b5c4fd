//! Tier configuration: the ordered size scale loaded from a YAML document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// The scale shipped with the crate, used when no tier file is given.
const BUILTIN_TIERS: &str = include_str!("../config/tiers.yaml");

/// Errors raised while loading a tier configuration. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tier configuration {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tier configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("tier configuration declares no tiers")]
    Empty,

    #[error("tier '{name}' has an invalid upper bound {bound}")]
    InvalidBound { name: String, bound: f64 },

    #[error("tier '{name}' declares no labels")]
    MissingLabels { name: String },

    #[error("tier '{name}' (upper bound {bound}) must have a larger bound than '{previous}' ({previous_bound})")]
    NotIncreasing {
        name: String,
        bound: f64,
        previous: String,
        previous_bound: f64,
    },
}

/// One bucket of the scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Short identifier (`mini`, `small`, ...).
    pub name: String,
    /// Inclusive upper bound in millimetres.
    pub upper_bound: f64,
    /// Label per locale code.
    pub labels: BTreeMap<String, String>,
}

impl Tier {
    /// Label for `locale`, if this tier declares one.
    pub fn label(&self, locale: &str) -> Option<&str> {
        self.labels.get(locale).map(|s| s.as_str())
    }

    /// Whether a value falls under this tier's bound.
    pub fn admits(&self, value: f64) -> bool {
        self.upper_bound >= value
    }
}

#[derive(Debug, Deserialize)]
struct TierDocument {
    tiers: Vec<Tier>,
}

/// Validated, immutable sequence of tiers in scan order.
///
/// Construction always goes through [`TierTable::new`], so every table in
/// circulation has at least one tier, labelled tiers and strictly increasing
/// bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Validate and wrap an ordered list of tiers.
    pub fn new(tiers: Vec<Tier>) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut previous: Option<&Tier> = None;
        for tier in &tiers {
            if tier.upper_bound.is_nan() || tier.upper_bound <= 0.0 {
                return Err(ConfigError::InvalidBound {
                    name: tier.name.clone(),
                    bound: tier.upper_bound,
                });
            }
            if tier.labels.is_empty() {
                return Err(ConfigError::MissingLabels {
                    name: tier.name.clone(),
                });
            }
            if let Some(prev) = previous.filter(|p| tier.upper_bound <= p.upper_bound) {
                return Err(ConfigError::NotIncreasing {
                    name: tier.name.clone(),
                    bound: tier.upper_bound,
                    previous: prev.name.clone(),
                    previous_bound: prev.upper_bound,
                });
            }
            previous = Some(tier);
        }

        Ok(Self { tiers })
    }

    /// Parse a YAML document with a top-level `tiers` list.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let doc: TierDocument = serde_yaml::from_str(source)?;
        Self::new(doc.tiers)
    }

    /// Load a tier file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_yaml_str(&source)?;
        info!(path = ?path, tiers = table.len(), "Loaded tier configuration");
        Ok(table)
    }

    /// The bundled spoon scale.
    pub fn builtin() -> Result<Self, ConfigError> {
        let table = Self::from_yaml_str(BUILTIN_TIERS)?;
        debug!(tiers = table.len(), "Using built-in tier configuration");
        Ok(table)
    }

    /// Tiers in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Locale codes that every tier declares a label for, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut iter = self.tiers.iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };
        let mut common: Vec<String> = first.labels.keys().cloned().collect();
        for tier in iter {
            common.retain(|locale| tier.labels.contains_key(locale));
        }
        common
    }
}

impl<'a> IntoIterator for &'a TierTable {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

/// Render the tier table as aligned text lines.
pub fn format_tier_table(table: &TierTable) -> String {
    let mut lines = Vec::new();

    lines.push("Tier Configuration".to_string());
    lines.push("=".repeat(40));
    lines.push(format!("Locales: {}", table.locales().join(", ")));
    lines.push(String::new());

    for tier in table {
        lines.push(format!("  {:<8} <= {} mm", tier.name, tier.upper_bound));
        for (locale, label) in &tier.labels {
            lines.push(format!("    {}: {}", locale, label));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tier(name: &str, bound: f64, en: &str) -> Tier {
        Tier {
            name: name.to_string(),
            upper_bound: bound,
            labels: BTreeMap::from([("en".to_string(), en.to_string())]),
        }
    }

    #[test]
    fn test_builtin_table() {
        let table = TierTable::builtin().unwrap();
        assert_eq!(table.len(), 4);

        let names: Vec<&str> = table.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["mini", "small", "medium", "large"]);
        assert_eq!(table.locales(), vec!["en".to_string(), "es".to_string()]);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
tiers:
  - name: low
    upper_bound: 5.5
    labels:
      en: "Low"
  - name: high
    upper_bound: .inf
    labels:
      en: "High"
"#;
        let table = TierTable::from_yaml_str(yaml).unwrap();
        assert_eq!(table.len(), 2);
        let high = table.iter().last().unwrap();
        assert!(high.upper_bound.is_infinite());
        assert_eq!(high.label("en"), Some("High"));
        assert_eq!(high.label("es"), None);
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let yaml = r#"
tiers:
  - name: low
    labels:
      en: "Low"
"#;
        let err = TierTable::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = TierTable::from_yaml_str("tiers: [oops").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_tiers_rejected() {
        let err = TierTable::from_yaml_str("tiers: []").unwrap_err();
        assert!(matches!(err, ConfigError::Empty));
    }

    #[test]
    fn test_missing_labels_rejected() {
        let mut bare = tier("bare", 3.0, "x");
        bare.labels.clear();
        let err = TierTable::new(vec![bare]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingLabels { .. }));
    }

    #[test]
    fn test_bounds_must_increase() {
        let err = TierTable::new(vec![
            tier("a", 10.0, "A"),
            tier("b", 10.0, "B"),
        ])
        .unwrap_err();
        match err {
            ConfigError::NotIncreasing { name, previous, .. } => {
                assert_eq!(name, "b");
                assert_eq!(previous, "a");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = TierTable::new(vec![tier("a", 10.0, "A"), tier("b", 4.0, "B")]).unwrap_err();
        assert!(matches!(err, ConfigError::NotIncreasing { .. }));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        for bound in [0.0, -3.0, f64::NAN] {
            let err = TierTable::new(vec![tier("a", bound, "A")]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBound { .. }));
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "tiers:\n  - name: only\n    upper_bound: 50\n    labels:\n      en: Only\n      es: Única"
        )
        .unwrap();

        let table = TierTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().label("es"), Some("Única"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TierTable::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_locales_intersection() {
        let mut a = tier("a", 1.0, "A");
        a.labels.insert("es".to_string(), "A-es".to_string());
        let b = tier("b", 2.0, "B");
        let table = TierTable::new(vec![a, b]).unwrap();
        assert_eq!(table.locales(), vec!["en".to_string()]);
    }

    #[test]
    fn test_format_tier_table() {
        let table = TierTable::builtin().unwrap();
        let text = format_tier_table(&table);
        assert!(text.contains("Locales: en, es"));
        assert!(text.contains("mini"));
        assert!(text.contains("en: Medium spoon (16 mm)"));
    }
}
