// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for calbump.
//!
//! This module contains pure logic: version resolution, format-preserving
//! text surgery and the operation records. All I/O (files, backups, history
//! persistence, git) is reached through ports defined in the application
//! layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No wall clock**: `now` is always injected
//! - **No logging**: Observability lives in the application and CLI layers
//! - **Immutable records**: Operations are Clone + PartialEq and never mutated

// Public API - what the world sees
pub mod calver;
pub mod entities;
pub mod error;
pub mod formats;
pub mod value_objects;

// Re-exports for convenience
pub use calver::{DatePattern, ParsedVersion, VersionSpec, VersionTemplate};
pub use entities::{
    BackupEntry, ContentHash, DEFAULT_HISTORY_LIMIT, FileChange, FileTarget, GitEffect, History,
    Operation, OperationId,
};
pub use error::DomainError;
pub use formats::{FormatHandler, WriteResult, handler_for};
pub use value_objects::{FileKind, FileType, ReleaseSuffix, VersionStandard};
