//! Audit log sinks.
//!
//! The audit log is business state read by operators, separate from tracing
//! diagnostics.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ecomsync_inventory::SyncLogEntry;
use ecomsync_sync::{PortError, SyncLog};

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySyncLog {
    inner: Mutex<Vec<SyncLogEntry>>,
}

impl InMemorySyncLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<SyncLogEntry> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl SyncLog for InMemorySyncLog {
    fn record(&self, entry: SyncLogEntry) -> Result<(), PortError> {
        self.inner
            .lock()
            .map_err(|_| PortError::storage("audit log lock poisoned"))?
            .push(entry);
        Ok(())
    }
}

/// Append-only JSON-lines file, one entry per line.
#[derive(Debug)]
pub struct JsonlSyncLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSyncLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every entry written so far. A missing file reads as empty.
    pub fn entries(&self) -> Result<Vec<SyncLogEntry>, PortError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PortError::storage(format!("read {}: {e}", self.path.display()))),
        };
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .map_err(|e| PortError::storage(format!("corrupt audit entry: {e}")))
            })
            .collect()
    }
}

impl SyncLog for JsonlSyncLog {
    fn record(&self, entry: SyncLogEntry) -> Result<(), PortError> {
        let line = serde_json::to_string(&entry)
            .map_err(|e| PortError::storage(format!("serialize audit entry: {e}")))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PortError::storage("audit log lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PortError::storage(format!("open {}: {e}", self.path.display())))?;
        writeln!(file, "{line}")
            .map_err(|e| PortError::storage(format!("append {}: {e}", self.path.display())))?;
        Ok(())
    }
}
