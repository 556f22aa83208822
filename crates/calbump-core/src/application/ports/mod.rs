//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `calbump-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `BackupStore`: Pre-edit snapshots
//!   - `HistoryStore`: Operation log persistence
//!   - `GitClient`: Tag, commit and reset
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{BackupStore, Filesystem, GitClient, HistoryStore, TagDeletion};

#[cfg(test)]
pub use output::{MockFilesystem, MockGitClient};
