//! Undo Service - reverse a recorded operation.
//!
//! Files come back byte-for-byte from their snapshots. Git effects are
//! reversed best-effort: problems become [`UndoWarning`]s rather than
//! errors, since the files are already restored by then.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError, HistoryService,
        ports::{BackupStore, Filesystem, GitClient, TagDeletion},
    },
    domain::{ContentHash, Operation, OperationId},
    error::CalbumpResult,
};

/// Which operation to undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoTarget {
    Latest,
    Id(OperationId),
}

/// A non-fatal finding during undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoWarning {
    /// The file changed (or vanished) after the bump; those edits are lost.
    ModifiedSinceBump { path: PathBuf },
    /// The recorded tag was already gone.
    TagMissing { tag: String },
    /// HEAD is no longer the bump commit, so no reset was done.
    HeadMoved { expected: String, actual: String },
    GitFailed { command: String, reason: String },
}

impl fmt::Display for UndoWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModifiedSinceBump { path } => write!(
                f,
                "{} was modified after the bump; those changes are overwritten",
                path.display()
            ),
            Self::TagMissing { tag } => write!(f, "tag {tag} no longer exists"),
            Self::HeadMoved { expected, actual } => write!(
                f,
                "HEAD moved from {expected} to {actual}; commit left in place"
            ),
            Self::GitFailed { command, reason } => write!(f, "git {command} failed: {reason}"),
        }
    }
}

/// Result of a completed undo.
#[derive(Debug, Clone)]
pub struct UndoReport {
    pub operation: Operation,
    pub restored: Vec<PathBuf>,
    pub warnings: Vec<UndoWarning>,
}

impl UndoReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Restores files and reverses git effects of recorded operations.
pub struct UndoService {
    filesystem: Arc<dyn Filesystem>,
    backups: Arc<dyn BackupStore>,
    history: HistoryService,
    git: Option<Arc<dyn GitClient>>,
}

impl UndoService {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        backups: Arc<dyn BackupStore>,
        history: HistoryService,
    ) -> Self {
        Self {
            filesystem,
            backups,
            history,
            git: None,
        }
    }

    pub fn with_git(mut self, git: Arc<dyn GitClient>) -> Self {
        self.git = Some(git);
        self
    }

    /// The warnings an undo would produce, without touching anything.
    pub fn check(&self, target: &UndoTarget) -> CalbumpResult<(Operation, Vec<UndoWarning>)> {
        let operation = self.find(target)?;
        self.require_backups(&operation)?;

        let mut warnings = self.modified_files(&operation);
        if let (Some(commit), Some(git)) = (operation.commit(), &self.git) {
            match git.current_head() {
                Ok(head) if head != commit => warnings.push(UndoWarning::HeadMoved {
                    expected: commit.to_string(),
                    actual: head,
                }),
                Ok(_) => {}
                Err(e) => warnings.push(UndoWarning::GitFailed {
                    command: "rev-parse HEAD".into(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok((operation, warnings))
    }

    /// Restore every file of the operation, then delete its tag and reset
    /// its commit. The record and its backups are kept, so an undo can be
    /// repeated.
    #[instrument(skip_all, fields(target = ?target))]
    pub fn undo(&self, target: &UndoTarget) -> CalbumpResult<UndoReport> {
        let operation = self.find(target)?;
        self.require_backups(&operation)?;

        let mut warnings = self.modified_files(&operation);
        for warning in &warnings {
            warn!(%warning, "Overwriting local changes");
        }

        let mut restored = Vec::with_capacity(operation.files.len());
        for entry in operation.backups() {
            self.backups.restore(&entry)?;
            restored.push(entry.original_path);
        }

        warnings.extend(self.reverse_git(&operation));

        info!(
            id = %operation.id,
            restored = restored.len(),
            warnings = warnings.len(),
            "Operation undone"
        );
        Ok(UndoReport {
            operation,
            restored,
            warnings,
        })
    }

    fn find(&self, target: &UndoTarget) -> CalbumpResult<Operation> {
        match target {
            UndoTarget::Latest => self.history.latest(),
            UndoTarget::Id(id) => self.history.get(id),
        }
    }

    fn require_backups(&self, operation: &Operation) -> CalbumpResult<()> {
        match operation.backups().find(|e| !self.backups.contains(e)) {
            Some(entry) => Err(ApplicationError::BackupMissing {
                path: entry.original_path,
                operation_id: operation.id.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }

    fn modified_files(&self, operation: &Operation) -> Vec<UndoWarning> {
        operation
            .files
            .iter()
            .filter(|change| match self.filesystem.read(&change.path) {
                Ok(bytes) => ContentHash::of(&bytes) != change.post_hash,
                Err(_) => true,
            })
            .map(|change| UndoWarning::ModifiedSinceBump {
                path: change.path.clone(),
            })
            .collect()
    }

    fn reverse_git(&self, operation: &Operation) -> Vec<UndoWarning> {
        let mut warnings = Vec::new();
        if operation.tag().is_none() && operation.commit().is_none() {
            return warnings;
        }
        let Some(git) = &self.git else {
            warnings.push(UndoWarning::GitFailed {
                command: "undo".into(),
                reason: "git is not available for this project".into(),
            });
            return warnings;
        };

        if let Some(tag) = operation.tag() {
            match git.delete_tag(tag) {
                Ok(TagDeletion::Deleted) => info!(%tag, "Tag deleted"),
                Ok(TagDeletion::NotFound) => warnings.push(UndoWarning::TagMissing {
                    tag: tag.to_string(),
                }),
                Err(e) => warnings.push(UndoWarning::GitFailed {
                    command: format!("tag -d {tag}"),
                    reason: e.to_string(),
                }),
            }
        }

        if let Some(commit) = operation.commit() {
            match git.current_head() {
                Ok(head) if head != commit => warnings.push(UndoWarning::HeadMoved {
                    expected: commit.to_string(),
                    actual: head,
                }),
                Ok(_) => match operation.git.as_ref().and_then(|g| g.parent.as_deref()) {
                    Some(parent) => match git.reset_to(parent) {
                        Ok(()) => info!(%parent, "Branch reset"),
                        Err(e) => warnings.push(UndoWarning::GitFailed {
                            command: format!("reset {parent}"),
                            reason: e.to_string(),
                        }),
                    },
                    None => warnings.push(UndoWarning::GitFailed {
                        command: "reset".into(),
                        reason: "the bump commit has no recorded parent".into(),
                    }),
                },
                Err(e) => warnings.push(UndoWarning::GitFailed {
                    command: "rev-parse HEAD".into(),
                    reason: e.to_string(),
                }),
            }
        }

        for warning in &warnings {
            warn!(%warning, "Git effect not fully reversed");
        }
        warnings
    }
}
