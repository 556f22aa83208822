//! Backup store adapters.

mod directory;

pub use directory::DirectoryBackupStore;
