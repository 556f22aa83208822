//! Finalized bump operations and the records they own.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hash::ContentHash;
use crate::domain::error::DomainError;

// ── OperationId ───────────────────────────────────────────────────────────────

/// `YYYYMMDDTHHMMSSffffff_NNNN`: a UTC timestamp with microseconds followed
/// by a sequence number.
///
/// Fixed width, so lexical order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationId(String);

const STAMP_LEN: usize = 21;
const ID_LEN: usize = STAMP_LEN + 1 + 4;

impl OperationId {
    /// A fresh id for `now` that sorts after every id in `existing` sharing
    /// its timestamp.
    pub fn generate<'a>(
        now: DateTime<Utc>,
        existing: impl IntoIterator<Item = &'a OperationId>,
    ) -> Self {
        let stamp = now.format("%Y%m%dT%H%M%S%6f").to_string();
        let sequence = existing
            .into_iter()
            .filter(|id| id.stamp() == stamp)
            .map(OperationId::sequence)
            .max()
            .map_or(1, |max| max + 1);
        Self(format!("{stamp}_{sequence:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn stamp(&self) -> &str {
        &self.0[..STAMP_LEN]
    }

    pub fn sequence(&self) -> u32 {
        self.0[STAMP_LEN + 1..].parse().unwrap_or(0)
    }
}

impl FromStr for OperationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == ID_LEN
            && bytes.iter().enumerate().all(|(i, b)| match i {
                8 => *b == b'T',
                STAMP_LEN => *b == b'_',
                _ => b.is_ascii_digit(),
            });
        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(DomainError::InvalidOperationId(s.to_string()))
        }
    }
}

impl TryFrom<String> for OperationId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OperationId> for String {
    fn from(value: OperationId) -> Self {
        value.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── FileChange / GitEffect ────────────────────────────────────────────────────

/// One file rewritten by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: PathBuf,
    /// Storage location of the pre-edit snapshot.
    pub backup: PathBuf,
    pub pre_hash: ContentHash,
    pub post_hash: ContentHash,
}

impl FileChange {
    pub fn backup_entry(&self, operation_id: &OperationId) -> BackupEntry {
        BackupEntry {
            operation_id: operation_id.clone(),
            original_path: self.path.clone(),
            location: self.backup.clone(),
        }
    }
}

/// What the git step actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Head before the bump commit; the reset target on undo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl GitEffect {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.commit.is_none()
    }
}

// ── BackupEntry ───────────────────────────────────────────────────────────────

/// A stored snapshot. The bytes live at `location` in the backup store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupEntry {
    pub operation_id: OperationId,
    pub original_path: PathBuf,
    pub location: PathBuf,
}

// ── Operation ─────────────────────────────────────────────────────────────────

/// A finalized, immutable bump record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub version: String,
    pub files: Vec<FileChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitEffect>,
}

impl Operation {
    pub fn backups(&self) -> impl Iterator<Item = BackupEntry> + '_ {
        self.files.iter().map(|f| f.backup_entry(&self.id))
    }

    pub fn change_for(&self, path: &Path) -> Option<&FileChange> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn tag(&self) -> Option<&str> {
        self.git.as_ref().and_then(|g| g.tag.as_deref())
    }

    pub fn commit(&self) -> Option<&str> {
        self.git.as_ref().and_then(|g| g.commit.as_deref())
    }
}
