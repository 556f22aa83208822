//! Snapshots stored as plain files, one directory per operation.
//!
//! Layout: `<root>/<operation id>/<sequence:03>_<file name>`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use calbump_core::{
    application::{ApplicationError, ports::{BackupStore, Filesystem}},
    domain::{BackupEntry, OperationId},
    error::CalbumpResult,
};
use tracing::{debug, instrument};

pub struct DirectoryBackupStore {
    root: PathBuf,
    fs: Arc<dyn Filesystem>,
}

impl DirectoryBackupStore {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn operation_dir(&self, id: &OperationId) -> PathBuf {
        self.root.join(id.as_str())
    }
}

impl BackupStore for DirectoryBackupStore {
    #[instrument(skip(self), fields(id = %operation_id))]
    fn snapshot(
        &self,
        operation_id: &OperationId,
        sequence: usize,
        path: &Path,
    ) -> CalbumpResult<BackupEntry> {
        let bytes = self.fs.read(path)?;

        let dir = self.operation_dir(operation_id);
        self.fs.create_dir_all(&dir)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".into());
        let location = dir.join(format!("{sequence:03}_{name}"));
        if self.fs.exists(&location) {
            return Err(ApplicationError::FilesystemError {
                path: location,
                reason: "backup already exists".into(),
            }
            .into());
        }

        self.fs.write(&location, &bytes)?;
        debug!(location = %location.display(), bytes = bytes.len(), "Snapshot stored");

        Ok(BackupEntry {
            operation_id: operation_id.clone(),
            original_path: path.to_path_buf(),
            location,
        })
    }

    fn restore(&self, entry: &BackupEntry) -> CalbumpResult<()> {
        if !self.fs.exists(&entry.location) {
            return Err(ApplicationError::BackupMissing {
                path: entry.original_path.clone(),
                operation_id: entry.operation_id.to_string(),
            }
            .into());
        }
        let bytes = self.fs.read(&entry.location)?;

        let restore_failed = |reason: String| ApplicationError::RestoreFailed {
            path: entry.original_path.clone(),
            reason,
        };
        if let Some(parent) = entry.original_path.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                return Err(restore_failed(format!("{} no longer exists", parent.display())).into());
            }
        }
        self.fs
            .write(&entry.original_path, &bytes)
            .map_err(|e| restore_failed(e.to_string()))?;

        debug!(path = %entry.original_path.display(), "Restored");
        Ok(())
    }

    fn contains(&self, entry: &BackupEntry) -> bool {
        self.fs.exists(&entry.location)
    }

    fn evict(&self, operation_id: &OperationId) -> CalbumpResult<()> {
        let dir = self.operation_dir(operation_id);
        if self.fs.exists(&dir) {
            self.fs.remove_dir_all(&dir)?;
        }
        Ok(())
    }

    fn operations(&self) -> CalbumpResult<Vec<OperationId>> {
        if !self.fs.exists(&self.root) {
            return Ok(Vec::new());
        }
        Ok(self
            .fs
            .list_dir(&self.root)?
            .iter()
            .filter_map(|p| p.file_name()?.to_str()?.parse().ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use calbump_core::error::CalbumpError;

    use super::*;
    use crate::MemoryFilesystem;

    fn id(second: u32) -> OperationId {
        OperationId::generate(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, second).unwrap(), [])
    }

    fn store() -> (DirectoryBackupStore, MemoryFilesystem) {
        let fs = MemoryFilesystem::new();
        fs.add_file("/p/version.py", "__version__ = '1'\n");
        fs.add_file("/p/sub/version.py", "__version__ = '2'\n");
        (DirectoryBackupStore::new("/p/.calbump/backups", Arc::new(fs.clone())), fs)
    }

    #[test]
    fn snapshot_layout_and_restore() {
        let (store, fs) = store();
        let op = id(1);

        let first = store.snapshot(&op, 1, Path::new("/p/version.py")).unwrap();
        let second = store.snapshot(&op, 2, Path::new("/p/sub/version.py")).unwrap();

        assert_eq!(
            first.location,
            PathBuf::from(format!("/p/.calbump/backups/{op}/001_version.py"))
        );
        // same file name, distinct entries
        assert_ne!(first.location, second.location);

        fs.add_file("/p/version.py", "changed");
        store.restore(&first).unwrap();
        assert_eq!(fs.read_file("/p/version.py").unwrap(), "__version__ = '1'\n");
    }

    #[test]
    fn entries_are_never_overwritten() {
        let (store, _) = store();
        let op = id(1);
        store.snapshot(&op, 1, Path::new("/p/version.py")).unwrap();
        assert!(store.snapshot(&op, 1, Path::new("/p/version.py")).is_err());
    }

    #[test]
    fn restore_fails_when_destination_directory_is_gone() {
        let (store, fs) = store();
        let entry = store.snapshot(&id(1), 1, Path::new("/p/sub/version.py")).unwrap();
        fs.remove_dir_all(Path::new("/p/sub")).unwrap();

        let err = store.restore(&entry).unwrap_err();
        assert!(matches!(
            err,
            CalbumpError::Application(ApplicationError::RestoreFailed { .. })
        ));
    }

    #[test]
    fn evict_and_list_operations() {
        let (store, _) = store();
        assert!(store.operations().unwrap().is_empty());

        let (a, b) = (id(1), id(2));
        let entry = store.snapshot(&a, 1, Path::new("/p/version.py")).unwrap();
        store.snapshot(&b, 1, Path::new("/p/version.py")).unwrap();
        assert_eq!(store.operations().unwrap(), vec![a.clone(), b.clone()]);

        store.evict(&a).unwrap();
        assert!(!store.contains(&entry));
        assert_eq!(store.operations().unwrap(), vec![b]);
        // evicting twice is a no-op
        store.evict(&a).unwrap();
    }
}
