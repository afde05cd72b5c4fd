//! Tier configuration, measurement classification and the audit trail.

pub mod audit;
pub mod classifier;
pub mod tiers;

pub use audit::{AuditLevel, AuditRecord, AuditSink, FileAuditLog, MemoryAuditLog, NullAuditLog};
pub use classifier::{
    ClassifyError, Classifier, DEFAULT_LOCALE, MAX_MEASUREMENT_MM, MIN_MEASUREMENT_MM,
    UNKNOWN_LABEL, validate,
};
pub use tiers::{ConfigError, Tier, TierTable, format_tier_table};
