//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `calbump-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{BackupEntry, Operation, OperationId};
use crate::error::CalbumpResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `calbump_adapters::filesystem::LocalFilesystem` (production)
/// - `calbump_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Reads of a missing file fail with `ApplicationError::FileNotFound`.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a file's raw bytes.
    fn read(&self, path: &Path) -> CalbumpResult<Vec<u8>>;

    /// Replace a file's content. The parent directory must exist.
    fn write(&self, path: &Path, content: &[u8]) -> CalbumpResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CalbumpResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> CalbumpResult<()>;

    /// Immediate children of a directory, sorted.
    fn list_dir(&self, path: &Path) -> CalbumpResult<Vec<PathBuf>>;
}

/// Port for pre-edit snapshots.
///
/// Implemented by:
/// - `calbump_adapters::backup::DirectoryBackupStore`
pub trait BackupStore: Send + Sync {
    /// Copy the current bytes of `path` into storage. Entries are never
    /// overwritten.
    fn snapshot(
        &self,
        operation_id: &OperationId,
        sequence: usize,
        path: &Path,
    ) -> CalbumpResult<BackupEntry>;

    /// Write a snapshot back to its original path. Fails with
    /// `ApplicationError::RestoreFailed` when the destination directory is
    /// gone.
    fn restore(&self, entry: &BackupEntry) -> CalbumpResult<()>;

    /// Whether the snapshot is still present.
    fn contains(&self, entry: &BackupEntry) -> bool;

    /// Delete every snapshot of an operation.
    fn evict(&self, operation_id: &OperationId) -> CalbumpResult<()>;

    /// Operations that currently own snapshots.
    fn operations(&self) -> CalbumpResult<Vec<OperationId>>;
}

/// Port for persisting the operation log, oldest first.
///
/// Implemented by:
/// - `calbump_adapters::history::JsonHistoryStore`
/// - `calbump_adapters::history::MemoryHistoryStore`
pub trait HistoryStore: Send + Sync {
    /// All persisted records. A missing store is an empty history.
    fn load(&self) -> CalbumpResult<Vec<Operation>>;

    /// Replace the persisted records.
    fn save(&self, operations: &[Operation]) -> CalbumpResult<()>;
}

/// Result of asking git to delete a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDeletion {
    Deleted,
    NotFound,
}

/// Port for the version-control collaborator.
///
/// Implemented by:
/// - `calbump_adapters::git::GitCli` (shells out to `git`)
#[cfg_attr(test, mockall::automock)]
pub trait GitClient: Send + Sync {
    fn create_tag(&self, name: &str) -> CalbumpResult<()>;

    fn delete_tag(&self, name: &str) -> CalbumpResult<TagDeletion>;

    /// Stage `paths` and commit them. Returns the new commit hash.
    fn commit(&self, message: &str, paths: &[PathBuf]) -> CalbumpResult<String>;

    /// Move the current branch to `commit`, keeping the working tree.
    fn reset_to(&self, commit: &str) -> CalbumpResult<()>;

    fn current_head(&self) -> CalbumpResult<String>;
}
