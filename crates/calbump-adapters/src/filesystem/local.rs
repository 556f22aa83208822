//! Local filesystem adapter using std::fs.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use calbump_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{CalbumpError, CalbumpResult},
};
use tempfile::NamedTempFile;
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read(&self, path: &Path) -> CalbumpResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into(),
            _ => ApplicationError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into(),
        })
    }

    fn write(&self, path: &Path, content: &[u8]) -> CalbumpResult<()> {
        atomic_write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> CalbumpResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> CalbumpResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn list_dir(&self, path: &Path) -> CalbumpResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;
        let mut children = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(path, e, "list directory"))?;
        children.sort();
        Ok(children)
    }
}

/// Write through a temp file in the same directory, fsync it, then rename it
/// over `path`. A crash leaves either the old or the new content.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    // Follow a symlink so the link itself survives the rename.
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    if let Ok(metadata) = std::fs::metadata(&target) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.as_file().sync_all()?;
    temp.persist(&target).map_err(|e| e.error)?;

    trace!(path = %target.display(), bytes = content.len(), "Atomic write");
    Ok(())
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CalbumpError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
