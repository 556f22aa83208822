//! Application layer for calbump.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (BumpService, UndoService, HistoryService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! version or format logic itself. Those rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    BumpPreview, BumpReport, BumpRequest, BumpService, GitOutcome, GitPolicy, HistoryService,
    TargetPreview, UndoReport, UndoService, UndoTarget, UndoWarning,
};

// Re-export port traits (for adapter implementation)
pub use ports::{BackupStore, Filesystem, GitClient, HistoryStore, TagDeletion};

pub use error::ApplicationError;
