//! Common utilities and constants for CLI commands

use anyhow::{Context, Result};
use spoonfit_tiers::{AuditSink, Classifier, FileAuditLog, NullAuditLog, TierTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Default audit log filename
pub const DEFAULT_AUDIT_LOG: &str = "spoonfit-audit.log";

/// Resolves a path to an absolute path.
/// If the path is relative, it's joined with the current directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("Failed to get current directory")?
            .join(path))
    }
}

/// Loads the tier table from `config`, or the built-in table when none is given.
pub fn load_tiers(config: Option<&Path>) -> Result<TierTable> {
    match config {
        Some(path) => {
            let path = resolve_path(path)?;
            TierTable::load(&path)
                .with_context(|| format!("Failed to load tier configuration {:?}", path))
        }
        None => TierTable::builtin().context("Built-in tier configuration is invalid"),
    }
}

/// Opens the audit sink. An unopenable log degrades to no auditing rather than aborting.
pub fn open_audit(audit_log: Option<&Path>) -> Arc<dyn AuditSink> {
    let Some(path) = audit_log else {
        return Arc::new(NullAuditLog);
    };

    match FileAuditLog::open(path) {
        Ok(log) => {
            info!("Audit log: {:?}", log.path());
            Arc::new(log)
        }
        Err(e) => {
            warn!("Could not open audit log {:?}: {}. Auditing disabled.", path, e);
            Arc::new(NullAuditLog)
        }
    }
}

/// Builds the classifier every command shares.
pub fn build_classifier(config: Option<&Path>, audit_log: Option<&Path>) -> Result<Classifier> {
    let tiers = load_tiers(config)?;
    Ok(Classifier::new(tiers, open_audit(audit_log)))
}
