//! In-memory port implementations for service unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::{
    ApplicationError,
    ports::{BackupStore, Filesystem, HistoryStore},
};
use crate::domain::{BackupEntry, Operation, OperationId};
use crate::error::CalbumpResult;

#[derive(Default)]
pub struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    failing: Mutex<Vec<PathBuf>>,
}

impl FakeFs {
    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.as_bytes().to_vec());
    }

    pub fn text(&self, path: impl AsRef<Path>) -> String {
        let files = self.files.lock().unwrap();
        String::from_utf8(files[path.as_ref()].clone()).unwrap()
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    /// Make the next write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().push(path.into());
    }
}

impl Filesystem for FakeFs {
    fn read(&self, path: &Path) -> CalbumpResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::FileNotFound { path: path.into() }.into())
    }

    fn write(&self, path: &Path, content: &[u8]) -> CalbumpResult<()> {
        let mut failing = self.failing.lock().unwrap();
        if let Some(at) = failing.iter().position(|p| p == path) {
            failing.remove(at);
            return Err(ApplicationError::FilesystemError {
                path: path.into(),
                reason: "disk full".into(),
            }
            .into());
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap()
            .keys()
            .any(|p| p.starts_with(path))
    }

    fn create_dir_all(&self, _path: &Path) -> CalbumpResult<()> {
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> CalbumpResult<()> {
        self.files
            .lock()
            .unwrap()
            .retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> CalbumpResult<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        let mut children: Vec<PathBuf> = files
            .keys()
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| path.join(c))
            .collect();
        children.dedup();
        Ok(children)
    }
}

/// Snapshots kept beside the fake filesystem under `/backups`.
pub struct FakeBackups {
    fs: Arc<FakeFs>,
    failing_restores: Mutex<Vec<PathBuf>>,
}

impl FakeBackups {
    pub fn new(fs: Arc<FakeFs>) -> Self {
        Self {
            fs,
            failing_restores: Mutex::new(Vec::new()),
        }
    }

    /// Make the next restore of `path` fail.
    pub fn fail_restore_of(&self, path: impl Into<PathBuf>) {
        self.failing_restores.lock().unwrap().push(path.into());
    }

    fn root() -> PathBuf {
        PathBuf::from("/backups")
    }
}

impl BackupStore for FakeBackups {
    fn snapshot(&self, id: &OperationId, sequence: usize, path: &Path) -> CalbumpResult<BackupEntry> {
        let bytes = self.fs.read(path)?;
        let name = path.file_name().unwrap().to_string_lossy();
        let location = Self::root()
            .join(id.as_str())
            .join(format!("{sequence:03}_{name}"));
        self.fs.write(&location, &bytes)?;
        Ok(BackupEntry {
            operation_id: id.clone(),
            original_path: path.into(),
            location,
        })
    }

    fn restore(&self, entry: &BackupEntry) -> CalbumpResult<()> {
        let mut failing = self.failing_restores.lock().unwrap();
        if let Some(at) = failing.iter().position(|p| *p == entry.original_path) {
            failing.remove(at);
            return Err(ApplicationError::RestoreFailed {
                path: entry.original_path.clone(),
                reason: "permission denied".into(),
            }
            .into());
        }
        drop(failing);
        let bytes = self.fs.read(&entry.location)?;
        self.fs.write(&entry.original_path, &bytes)
    }

    fn contains(&self, entry: &BackupEntry) -> bool {
        self.fs.exists(&entry.location)
    }

    fn evict(&self, id: &OperationId) -> CalbumpResult<()> {
        self.fs.remove_dir_all(&Self::root().join(id.as_str()))
    }

    fn operations(&self) -> CalbumpResult<Vec<OperationId>> {
        Ok(self
            .fs
            .list_dir(&Self::root())?
            .iter()
            .filter_map(|p| p.file_name()?.to_str()?.parse().ok())
            .collect())
    }
}

#[derive(Default)]
pub struct FakeHistory {
    records: Mutex<Vec<Operation>>,
    pub fail_saves: Mutex<bool>,
}

impl HistoryStore for FakeHistory {
    fn load(&self) -> CalbumpResult<Vec<Operation>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save(&self, operations: &[Operation]) -> CalbumpResult<()> {
        if *self.fail_saves.lock().unwrap() {
            return Err(ApplicationError::FilesystemError {
                path: "history.json".into(),
                reason: "read-only".into(),
            }
            .into());
        }
        *self.records.lock().unwrap() = operations.to_vec();
        Ok(())
    }
}
