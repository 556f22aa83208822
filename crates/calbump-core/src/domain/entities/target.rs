//! The `FileTarget` value: one (file, variable, directive) triple to update.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{
    error::DomainError,
    formats::{FormatHandler, handler_for},
    value_objects::{FileKind, FileType, VersionStandard},
};

/// A validated description of where a version lives.
///
/// Invariants enforced on construction:
/// - `variable` is not empty
/// - container-directive targets name a directive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTarget {
    path: PathBuf,
    file_type: FileType,
    variable: String,
    directive: Option<String>,
    version_standard: VersionStandard,
}

impl FileTarget {
    pub fn new(
        path: impl Into<PathBuf>,
        file_type: FileType,
        variable: impl Into<String>,
        directive: Option<&str>,
        version_standard: VersionStandard,
    ) -> Result<Self, DomainError> {
        let path = path.into();
        let variable = variable.into();
        let directive = directive
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        if path.as_os_str().is_empty() {
            return Err(DomainError::InvalidTarget("path must not be empty".into()));
        }
        if variable.trim().is_empty() {
            return Err(DomainError::InvalidTarget(format!(
                "{}: variable must not be empty",
                path.display()
            )));
        }
        if file_type.requires_directive() && directive.is_none() {
            return Err(DomainError::InvalidTarget(format!(
                "{}: {} targets need a directive such as ARG or ENV",
                path.display(),
                file_type
            )));
        }

        Ok(Self {
            path,
            file_type,
            variable,
            directive,
            version_standard,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    pub const fn kind(&self) -> FileKind {
        self.file_type.kind()
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn directive(&self) -> Option<&str> {
        self.directive.as_deref()
    }

    pub const fn version_standard(&self) -> VersionStandard {
        self.version_standard
    }

    pub fn handler(&self) -> &'static dyn FormatHandler {
        handler_for(self.file_type)
    }

    /// Resolve a relative path against `root`.
    pub fn rooted(&self, root: &Path) -> Self {
        let mut target = self.clone();
        if target.path.is_relative() {
            target.path = root.join(&self.path);
        }
        target
    }
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.path.display(), self.variable)?;
        if let Some(d) = &self.directive {
            write!(f, " under {d}")?;
        }
        write!(f, ", {})", self.file_type)
    }
}
