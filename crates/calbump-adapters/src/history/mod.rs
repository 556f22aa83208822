//! History store adapters.

mod json;
mod memory;

pub use json::{HISTORY_FILE, JsonHistoryStore};
pub use memory::MemoryHistoryStore;
