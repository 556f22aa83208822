//! Calbump Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the calbump
//! calendar-versioning tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           calbump-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (BumpService, UndoService, History...)  │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, BackupStore, HistoryStore, │
//! │              GitClient)                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    calbump-adapters (Infrastructure)    │
//! │ (LocalFilesystem, DirectoryBackupStore, │
//! │     JsonHistoryStore, GitCli, ...)      │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (VersionSpec, FormatHandler, Operation) │
//! │              No I/O                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use calbump_core::{
//!     application::{BumpRequest, BumpService, GitPolicy},
//!     domain::{FileTarget, FileType, VersionSpec, VersionStandard},
//!     error::CalbumpResult,
//! };
//!
//! fn release(service: &BumpService) -> CalbumpResult<()> {
//!     // 1. Describe the version scheme and the files that carry it
//!     let spec = VersionSpec::new("{current_date}-{build_count:03}", "%Y.%m.%d", "UTC")?;
//!     let target = FileTarget::new("version.py", FileType::Python, "__version__", None,
//!         VersionStandard::Literal)?;
//!
//!     // 2. Run the transaction (adapters were injected when the service was built)
//!     let request = BumpRequest::new(spec, vec![target]).git(GitPolicy::disabled());
//!     let report = service.bump(&request, chrono::Utc::now())?;
//!     println!("bumped to {}", report.operation.version);
//!     Ok(())
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BumpReport, BumpRequest, BumpService, GitOutcome, GitPolicy, HistoryService, UndoReport,
        UndoService, UndoTarget, UndoWarning,
        ports::{BackupStore, Filesystem, GitClient, HistoryStore, TagDeletion},
    };
    pub use crate::domain::{
        BackupEntry, ContentHash, FileChange, FileKind, FileTarget, FileType, GitEffect, History,
        Operation, OperationId, ReleaseSuffix, VersionSpec, VersionStandard,
    };
    pub use crate::error::{CalbumpError, CalbumpResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
