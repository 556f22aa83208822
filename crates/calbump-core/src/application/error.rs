//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! version or format logic. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A domain check failed for one particular target file.
    #[error("{}: {source}", path.display())]
    Target { path: PathBuf, source: DomainError },

    /// A target or backup file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A file exists but could not be read or decoded.
    #[error("Failed to read {}: {reason}", path.display())]
    ReadFailed { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// A write failed; every file of the operation was restored.
    #[error("Writing {} failed, all changes were rolled back: {reason}", path.display())]
    RolledBack { path: PathBuf, reason: String },

    /// Some files could not be put back after a failed write. Every other
    /// file of the operation was restored.
    #[error("Rollback failed for {}: {reason}", display_paths(paths))]
    RollbackFailed { paths: Vec<PathBuf>, reason: String },

    /// A snapshot could not be written back.
    #[error("Failed to restore {}: {reason}", path.display())]
    RestoreFailed { path: PathBuf, reason: String },

    /// A backup an operation depends on is gone.
    #[error("Backup for {} in operation {operation_id} is missing", path.display())]
    BackupMissing { path: PathBuf, operation_id: String },

    /// No operation with this id is recorded.
    #[error("Operation {id} not found in history")]
    OperationNotFound { id: String },

    /// Nothing has been recorded yet.
    #[error("History is empty")]
    HistoryEmpty,

    /// The persisted history could not be parsed.
    #[error("History at {} is corrupted: {reason}", path.display())]
    HistoryCorrupted { path: PathBuf, reason: String },

    /// Files were written but the record could not be saved.
    #[error("Failed to record operation in history: {reason}")]
    HistoryWriteFailed { reason: String },

    /// A git command failed.
    #[error("git {command} failed: {reason}")]
    GitFailed { command: String, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Store lock poisoned")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Target { source, .. } => source.suggestions(),
            Self::FileNotFound { path } => vec![
                format!("Missing: {}", path.display()),
                "Check the 'path' of this entry in [[files]]".into(),
                "Relative paths resolve against the project root (-C)".into(),
            ],
            Self::ReadFailed { .. } => vec![
                "Check that the file is readable and UTF-8 encoded".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::RolledBack { .. } => vec![
                "No file was changed and nothing was recorded".into(),
                "Fix the cause above and run the bump again".into(),
            ],
            Self::RollbackFailed { paths, .. } => vec![
                format!("{} may be left in an intermediate state", display_paths(paths)),
                "Their snapshots are kept under .calbump/backups".into(),
            ],
            Self::RestoreFailed { path, .. } => vec![
                format!("{} may be left in an intermediate state", path.display()),
                "Its snapshot is kept under .calbump/backups".into(),
            ],
            Self::BackupMissing { .. } => vec![
                "The backup was deleted outside of calbump".into(),
                "This operation can no longer be undone automatically".into(),
            ],
            Self::OperationNotFound { .. } => vec![
                "List recorded operations with: calbump history".into(),
                "Old operations are evicted once the history limit is reached".into(),
            ],
            Self::HistoryEmpty => vec!["Run calbump bump first".into()],
            Self::HistoryCorrupted { path, .. } => vec![
                format!("Inspect or remove {}", path.display()),
                "Removing it forgets every recorded operation".into(),
            ],
            Self::HistoryWriteFailed { .. } => vec![
                "The files were updated but this bump cannot be undone".into(),
                "Check permissions on the history directory".into(),
            ],
            Self::GitFailed { .. } => vec![
                "Check that the project is a git repository".into(),
                "Run the git command by hand to see its full output".into(),
            ],
            Self::StoreLockError => vec![
                "An internal store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Target { source, .. } => source.category(),
            Self::FileNotFound { .. } | Self::OperationNotFound { .. } | Self::HistoryEmpty => {
                ErrorCategory::NotFound
            }
            Self::BackupMissing { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::RolledBack { .. } => ErrorCategory::RolledBack,
            Self::ReadFailed { .. }
            | Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::RestoreFailed { .. }
            | Self::HistoryCorrupted { .. }
            | Self::HistoryWriteFailed { .. }
            | Self::GitFailed { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
