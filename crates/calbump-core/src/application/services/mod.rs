//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "bump every target" or "undo the last bump".
//! They share adapters through `Arc`, since one backup store and one history
//! serve several services.

pub mod bump_service;
pub mod history_service;
pub mod undo_service;

#[cfg(test)]
pub(crate) mod testing;

pub use bump_service::{
    BumpPreview, BumpReport, BumpRequest, BumpService, GitOutcome, GitPolicy, TargetPreview,
};
pub use history_service::HistoryService;
pub use undo_service::{UndoReport, UndoService, UndoTarget, UndoWarning};
