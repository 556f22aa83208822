//! In-memory history store for testing.

use std::sync::{Arc, RwLock};

use calbump_core::{
    application::{ApplicationError, ports::HistoryStore},
    domain::Operation,
    error::CalbumpResult,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    records: Arc<RwLock<Vec<Operation>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> CalbumpResult<Vec<Operation>> {
        let records = self
            .records
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(records.clone())
    }

    fn save(&self, operations: &[Operation]) -> CalbumpResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *records = operations.to_vec();
        Ok(())
    }
}
