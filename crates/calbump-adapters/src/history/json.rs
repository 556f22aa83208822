//! Operation log persisted as a pretty-printed JSON array, oldest first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use calbump_core::{
    application::{ApplicationError, ports::{Filesystem, HistoryStore}},
    domain::Operation,
    error::CalbumpResult,
};
use tracing::debug;

pub const HISTORY_FILE: &str = "history.json";

pub struct JsonHistoryStore {
    path: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl JsonHistoryStore {
    /// Store at `<dir>/history.json`.
    pub fn in_dir(dir: impl AsRef<Path>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            path: dir.as_ref().join(HISTORY_FILE),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupted(&self, reason: impl ToString) -> ApplicationError {
        ApplicationError::HistoryCorrupted {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> CalbumpResult<Vec<Operation>> {
        if !self.fs.exists(&self.path) {
            return Ok(Vec::new());
        }
        let bytes = self.fs.read(&self.path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let operations: Vec<Operation> =
            serde_json::from_slice(&bytes).map_err(|e| self.corrupted(e))?;
        debug!(count = operations.len(), "History loaded");
        Ok(operations)
    }

    fn save(&self, operations: &[Operation]) -> CalbumpResult<()> {
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let mut json = serde_json::to_vec_pretty(operations).map_err(|e| {
            ApplicationError::HistoryWriteFailed {
                reason: e.to_string(),
            }
        })?;
        json.push(b'\n');
        self.fs.write(&self.path, &json)
    }
}
