//! Append-only record of served exchange commands.
use chat_common::Result;
use chrono::NaiveDateTime;
use log::debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// ISO-8601 local timestamp with microseconds, one per line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Sink for one line per completed exchange command.
pub trait AuditLog: Send + Sync {
    /// Append an entry stamped with `at`.
    fn append(&self, at: NaiveDateTime) -> Result<()>;
}

/// Audit log kept in a plain text file that is created on first use.
pub struct FileAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditLog {
    /// Audit log writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditLog for FileAuditLog {
    fn append(&self, at: NaiveDateTime) -> Result<()> {
        let _guard = self.write_lock.lock()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", at.format(TIMESTAMP_FORMAT))?;
        debug!("Exchange logged to {}", self.path.display());
        Ok(())
    }
}
