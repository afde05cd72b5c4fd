//! Plausibility gate and tier lookup.

use crate::audit::{AuditLevel, AuditRecord, AuditSink, NullAuditLog};
use crate::tiers::{Tier, TierTable};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Lower plausibility bound in millimetres (exclusive).
pub const MIN_MEASUREMENT_MM: f64 = 0.0;

/// Upper plausibility bound in millimetres (inclusive).
pub const MAX_MEASUREMENT_MM: f64 = 500.0;

/// Locale used when a caller does not pick one.
pub const DEFAULT_LOCALE: &str = "en";

/// Label returned when no tier admits a value.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Per-call classification failures. Both are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("measurement {value} mm is outside the plausible range (0, 500]")]
    InvalidMeasurement { value: f64 },

    #[error("tier '{tier}' has no label for locale '{locale}'")]
    MissingLocale { tier: String, locale: String },
}

impl ClassifyError {
    /// Stable machine-readable code, used by the HTTP API.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMeasurement { .. } => "INVALID_MEASUREMENT",
            Self::MissingLocale { .. } => "MISSING_LOCALE",
        }
    }
}

/// Reject values outside `(0, 500]`. NaN is rejected as well.
pub fn validate(value: f64) -> Result<(), ClassifyError> {
    if value > MIN_MEASUREMENT_MM && value <= MAX_MEASUREMENT_MM {
        Ok(())
    } else {
        Err(ClassifyError::InvalidMeasurement { value })
    }
}

/// Maps measurements onto the tier table.
///
/// The table is owned and never changes after construction, so a `Classifier`
/// can be shared across threads behind an `Arc`. The only side effect of
/// [`Classifier::classify`] is the audit append.
pub struct Classifier {
    tiers: TierTable,
    audit: Arc<dyn AuditSink>,
}

impl Classifier {
    pub fn new(tiers: TierTable, audit: Arc<dyn AuditSink>) -> Self {
        Self { tiers, audit }
    }

    /// Classifier that keeps no audit trail.
    pub fn without_audit(tiers: TierTable) -> Self {
        Self::new(tiers, Arc::new(NullAuditLog))
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// First tier (in declared order) whose bound is not exceeded by `value`.
    pub fn tier_for(&self, value: f64) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.admits(value))
    }

    /// Validate `value` and return the `locale` label of its tier.
    ///
    /// Returns [`UNKNOWN_LABEL`] when no tier admits the value, which only
    /// happens with tables whose last bound sits below [`MAX_MEASUREMENT_MM`].
    pub fn classify(&self, value: f64, locale: &str) -> Result<String, ClassifyError> {
        validate(value)?;

        let Some(tier) = self.tier_for(value) else {
            warn!(value, "No tier admits measurement");
            self.record(AuditRecord {
                level: AuditLevel::Warn,
                ..AuditRecord::classification(value, locale, UNKNOWN_LABEL)
            });
            return Ok(UNKNOWN_LABEL.to_string());
        };

        let label = tier.label(locale).ok_or_else(|| ClassifyError::MissingLocale {
            tier: tier.name.clone(),
            locale: locale.to_string(),
        })?;

        debug!(value, locale, tier = %tier.name, "Classified measurement");
        self.record(AuditRecord::classification(value, locale, label));

        Ok(label.to_string())
    }

    fn record(&self, record: AuditRecord) {
        if let Err(e) = self.audit.append(&record) {
            warn!(error = %e, "Failed to write audit record");
        }
    }
}
