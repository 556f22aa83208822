//! Infrastructure adapters for calbump.
//!
//! This crate implements the ports defined in `calbump-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod backup;
pub mod filesystem;
pub mod git;
pub mod history;

// Re-export commonly used adapters
pub use backup::DirectoryBackupStore;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::GitCli;
pub use history::{JsonHistoryStore, MemoryHistoryStore};
