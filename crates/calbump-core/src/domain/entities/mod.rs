pub mod hash;
pub mod history;
pub mod operation;
pub mod target;

pub use hash::ContentHash;
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use operation::{BackupEntry, FileChange, GitEffect, Operation, OperationId};
pub use target::FileTarget;
