use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

/// Append-only audit trail: one `[RFC3339-timestamp] MESSAGE` line per
/// engine operation, successes and validation failures alike.
///
/// A write failure is reported through the log facade but never interrupts
/// the operation that triggered it.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one timestamped line for the given message.
    pub fn record(&self, message: &str) {
        let line = format!("[{}] {}\n", Utc::now().to_rfc3339(), message);

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(err) = result {
            log::warn!("audit log write to {} failed: {err}", self.path.display());
        }
    }
}
