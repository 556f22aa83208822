//! Subcommand handlers.
//!
//! Each handler receives parsed arguments, the loaded [`AppConfig`] and an
//! [`OutputManager`], and returns an [`Outcome`] or a [`CliError`].

pub mod bump;
pub mod completions;
pub mod config;
pub mod history;
pub mod init;
pub mod undo;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use calbump_adapters::{DirectoryBackupStore, GitCli, JsonHistoryStore, LocalFilesystem};
use calbump_core::application::{
    BumpService, HistoryService, UndoService,
    ports::{BackupStore, Filesystem, GitClient, HistoryStore},
};

use crate::config::AppConfig;

/// How a command that ran to completion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// Finished, but something the user asked for did not happen.
    Warnings,
}

/// Adapters wired for one project root.
pub struct Project {
    filesystem: Arc<dyn Filesystem>,
    backups: Arc<dyn BackupStore>,
    history: HistoryService,
    git: Option<Arc<dyn GitClient>>,
}

impl Project {
    /// Open the `.calbump` state of `root` as configured.
    pub fn open(root: &Path, config: &AppConfig) -> Self {
        let state = config.state_dir(root);
        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let backups: Arc<dyn BackupStore> =
            Arc::new(DirectoryBackupStore::new(state.join("backups"), filesystem.clone()));
        let store: Arc<dyn HistoryStore> =
            Arc::new(JsonHistoryStore::in_dir(&state, filesystem.clone()));
        let history = HistoryService::new(store, backups.clone(), config.history.limit);

        let git: Option<Arc<dyn GitClient>> = if GitCli::is_repository(root) {
            Some(Arc::new(GitCli::new(root)))
        } else {
            None
        };
        debug!(
            root = %root.display(),
            state = %state.display(),
            git = git.is_some(),
            "Project opened"
        );

        Self {
            filesystem,
            backups,
            history,
            git,
        }
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    pub fn bump_service(&self) -> BumpService {
        let service = BumpService::new(
            self.filesystem.clone(),
            self.backups.clone(),
            self.history.clone(),
        );
        match &self.git {
            Some(git) => service.with_git(git.clone()),
            None => service,
        }
    }

    pub fn undo_service(&self) -> UndoService {
        let service = UndoService::new(
            self.filesystem.clone(),
            self.backups.clone(),
            self.history.clone(),
        );
        match &self.git {
            Some(git) => service.with_git(git.clone()),
            None => service,
        }
    }
}

/// Show `path` relative to the project root when it lies inside it.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
