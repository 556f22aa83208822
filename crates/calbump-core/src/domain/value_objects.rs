//! Domain value objects: FileType, FileKind, VersionStandard, ReleaseSuffix.
//!
//! # Design
//!
//! These are pure value types, equality-by-value, no identity. They hold no
//! parsing logic for file contents; that lives in `formats`. This file's only
//! job is to define the types, their string representations, and their
//! `FromStr` parsers.
//!
//! # Adding a New File Type
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str`, `kind` and `FromStr` arms here
//! 3. Return its handler from `formats::handler_for`
//! 4. Done, nothing else changes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── FileType ──────────────────────────────────────────────────────────────────

/// A concrete file syntax calbump knows how to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FileType {
    Python,
    Toml,
    Yaml,
    Json,
    SetupCfg,
    Xml,
    Makefile,
    Properties,
    Env,
    Dockerfile,
}

impl FileType {
    pub const ALL: [FileType; 10] = [
        Self::Python,
        Self::Toml,
        Self::Yaml,
        Self::Json,
        Self::SetupCfg,
        Self::Xml,
        Self::Makefile,
        Self::Properties,
        Self::Env,
        Self::Dockerfile,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::SetupCfg => "setup.cfg",
            Self::Xml => "xml",
            Self::Makefile => "makefile",
            Self::Properties => "properties",
            Self::Env => "env",
            Self::Dockerfile => "dockerfile",
        }
    }

    /// The family of syntaxes this file type belongs to.
    pub const fn kind(&self) -> FileKind {
        match self {
            Self::Python => FileKind::SourceAssignment,
            Self::Toml | Self::Yaml | Self::Json | Self::SetupCfg => FileKind::StructuredKeyValue,
            Self::Xml => FileKind::Markup,
            Self::Makefile | Self::Properties | Self::Env => FileKind::BuildVariable,
            Self::Dockerfile => FileKind::ContainerDirective,
        }
    }

    /// Whether targets of this type must name a directive.
    pub const fn requires_directive(&self) -> bool {
        matches!(self.kind(), FileKind::ContainerDirective)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "setup.cfg" | "setupcfg" | "ini" | "cfg" => Ok(Self::SetupCfg),
            "xml" => Ok(Self::Xml),
            "makefile" | "make" => Ok(Self::Makefile),
            "properties" => Ok(Self::Properties),
            "env" | "dotenv" => Ok(Self::Env),
            "dockerfile" | "containerfile" => Ok(Self::Dockerfile),
            other => Err(DomainError::UnsupportedFileType(other.to_string())),
        }
    }
}

impl TryFrom<String> for FileType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FileType> for String {
    fn from(value: FileType) -> Self {
        value.as_str().to_string()
    }
}

// ── FileKind ──────────────────────────────────────────────────────────────────

/// The five syntax families a target can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    SourceAssignment,
    StructuredKeyValue,
    Markup,
    BuildVariable,
    ContainerDirective,
}

impl FileKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SourceAssignment => "source-assignment",
            Self::StructuredKeyValue => "structured-key-value",
            Self::Markup => "markup",
            Self::BuildVariable => "build-variable",
            Self::ContainerDirective => "container-directive",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── VersionStandard ───────────────────────────────────────────────────────────

/// How a resolved version is rewritten before it lands in a particular file.
///
/// `Normalized` applies this substitution table, in order:
///
/// | step | input                                   | output            |
/// |------|-----------------------------------------|-------------------|
/// | 1    | any run of `-`, `_`, `.`                | a single `.`      |
/// | 2    | an all-digit group between dots         | leading zeros cut |
/// | 3    | everything else                         | unchanged         |
///
/// so `2025-08-31-004` becomes `2025.8.31.4` and `24.Q1_010` becomes
/// `24.Q1.10`. The mapping is total and deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionStandard {
    #[default]
    Literal,
    Normalized,
}

impl VersionStandard {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "default",
            Self::Normalized => "python",
        }
    }

    /// Rewrite `version` according to this standard.
    pub fn normalize(&self, version: &str) -> String {
        match self {
            Self::Literal => version.to_string(),
            Self::Normalized => normalize_separators(version),
        }
    }
}

fn normalize_separators(version: &str) -> String {
    let mut collapsed = String::with_capacity(version.len());
    let mut in_separator = false;
    for c in version.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                collapsed.push('.');
            }
            in_separator = true;
        } else {
            collapsed.push(c);
            in_separator = false;
        }
    }

    collapsed
        .split('.')
        .map(|group| {
            if !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = group.trim_start_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }
            } else {
                group
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl fmt::Display for VersionStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionStandard {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "default" | "literal" => Ok(Self::Literal),
            "python" | "pep440" | "normalized" => Ok(Self::Normalized),
            other => Err(DomainError::UnknownVersionStandard(other.to_string())),
        }
    }
}

impl TryFrom<String> for VersionStandard {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionStandard> for String {
    fn from(value: VersionStandard) -> Self {
        value.as_str().to_string()
    }
}

// ── ReleaseSuffix ─────────────────────────────────────────────────────────────

/// Optional pre-release / release marker appended as `.<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReleaseSuffix {
    Beta,
    Rc,
    Release,
    Custom(String),
}

impl ReleaseSuffix {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Beta => "beta",
            Self::Rc => "rc",
            Self::Release => "release",
            Self::Custom(s) => s,
        }
    }

    /// Append this suffix to a resolved version.
    pub fn apply(&self, version: &str) -> String {
        format!("{version}.{}", self.as_str())
    }
}

impl fmt::Display for ReleaseSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
