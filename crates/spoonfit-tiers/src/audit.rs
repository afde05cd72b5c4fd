//! Append-only audit trail for successful classifications.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Severity written alongside each audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warn,
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
        }
    }
}

/// One line of the audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub level: AuditLevel,
    pub message: String,
}

impl AuditRecord {
    /// Create an info record stamped with the current time.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level: AuditLevel::Info,
            message: message.into(),
        }
    }

    /// Record for a completed classification.
    pub fn classification(value: f64, locale: &str, label: &str) -> Self {
        Self::info(format!(
            "classified value={} locale={} label={:?}",
            value, locale, label
        ))
    }

    /// Render as a single line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.message
        )
    }
}

/// Destination for audit records. Implementations must tolerate concurrent appends.
pub trait AuditSink: Send + Sync {
    fn append(&self, record: &AuditRecord) -> io::Result<()>;
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditLog;

impl AuditSink for NullAuditLog {
    fn append(&self, _record: &AuditRecord) -> io::Result<()> {
        Ok(())
    }
}

/// Appends one line per record to a file.
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditLog {
    /// Open (or create) the log file in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = ?path, "Opened audit log");
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(|e| {
            warn!("FileAuditLog mutex was poisoned, recovering");
            e.into_inner()
        });
        writeln!(file, "{}", record.to_line())?;
        file.flush()
    }
}

/// Keeps records in memory. Handy for tests and for inspecting the trail in-process.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| {
                warn!("MemoryAuditLog mutex was poisoned, recovering");
                e.into_inner()
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| {
            warn!("MemoryAuditLog mutex was poisoned, recovering");
            e.into_inner()
        });
        records.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_line_format() {
        let record = AuditRecord::classification(12.0, "en", "Small spoon (12 mm)");
        let line = record.to_line();

        assert!(line.contains(" INFO "));
        assert!(line.ends_with(r#"classified value=12 locale=en label="Small spoon (12 mm)""#));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_file_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let log = FileAuditLog::open(&path).unwrap();
        log.append(&AuditRecord::info("first")).unwrap();
        log.append(&AuditRecord::info("second")).unwrap();
        drop(log);

        // Reopening must not truncate
        let log = FileAuditLog::open(&path).unwrap();
        log.append(&AuditRecord::info("third")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("INFO first"));
        assert!(lines[2].ends_with("INFO third"));
    }

    #[test]
    fn test_file_log_concurrent_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let log = Arc::new(FileAuditLog::open(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..25 {
                        log.append(&AuditRecord::info(format!("thread={} i={}", t, i)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 200);
        assert!(content.lines().all(|l| l.contains(" INFO thread=")));
    }

    #[test]
    fn test_memory_log() {
        let log = MemoryAuditLog::new();
        assert!(log.is_empty());
        log.append(&AuditRecord::info("hello")).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].message, "hello");
        assert_eq!(log.records()[0].level, AuditLevel::Info);
    }
}
