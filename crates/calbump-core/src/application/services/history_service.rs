//! History Service - the bounded operation log.
//!
//! Wraps a `HistoryStore` with the ring semantics of `domain::History` and
//! releases the backups of evicted operations.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{BackupStore, HistoryStore},
    },
    domain::{History, Operation, OperationId},
    error::CalbumpResult,
};

/// Read and append access to the operation log.
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
    backups: Arc<dyn BackupStore>,
    limit: usize,
}

impl HistoryService {
    pub fn new(store: Arc<dyn HistoryStore>, backups: Arc<dyn BackupStore>, limit: usize) -> Self {
        Self {
            store,
            backups,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The current log, trimmed to the configured limit.
    pub fn load(&self) -> CalbumpResult<History> {
        let (history, _) = History::from_records(self.limit, self.store.load()?);
        Ok(history)
    }

    /// Append a finalized operation.
    ///
    /// The record is saved before evicted operations lose their backups, so
    /// a failure in between only leaves orphaned backups behind. Returns the
    /// ids of evicted operations.
    #[instrument(skip_all, fields(id = %operation.id))]
    pub fn append(&self, operation: Operation) -> CalbumpResult<Vec<OperationId>> {
        let (mut history, mut evicted) = History::from_records(self.limit, self.store.load()?);
        evicted.extend(history.push(operation));

        let records: Vec<Operation> = history.records().cloned().collect();
        self.store
            .save(&records)
            .map_err(|e| ApplicationError::HistoryWriteFailed {
                reason: e.to_string(),
            })?;

        let ids: Vec<OperationId> = evicted.into_iter().map(|op| op.id).collect();
        for id in &ids {
            match self.backups.evict(id) {
                Ok(()) => debug!(%id, "Evicted operation and its backups"),
                Err(e) => warn!(%id, error = %e, "Evicted operation but its backups remain"),
            }
        }
        info!(len = history.len(), evicted = ids.len(), "Operation recorded");
        Ok(ids)
    }

    /// Up to `limit` operations, most recent first.
    pub fn list(&self, limit: Option<usize>) -> CalbumpResult<Vec<Operation>> {
        let history = self.load()?;
        Ok(history
            .recent()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    pub fn get(&self, id: &OperationId) -> CalbumpResult<Operation> {
        self.load()?
            .get(id)
            .cloned()
            .ok_or_else(|| ApplicationError::OperationNotFound { id: id.to_string() }.into())
    }

    pub fn latest(&self) -> CalbumpResult<Operation> {
        self.load()?
            .latest()
            .cloned()
            .ok_or_else(|| ApplicationError::HistoryEmpty.into())
    }

    /// Delete backups that no recorded operation owns, e.g. from an
    /// interrupted bump. Returns the ids that were removed.
    #[instrument(skip_all)]
    pub fn prune_orphans(&self) -> CalbumpResult<Vec<OperationId>> {
        let history = self.load()?;
        let known: HashSet<&OperationId> = history.ids().collect();

        let mut pruned = Vec::new();
        for id in self.backups.operations()? {
            if known.contains(&id) {
                continue;
            }
            self.backups.evict(&id)?;
            debug!(%id, "Pruned orphaned backups");
            pruned.push(id);
        }
        info!(count = pruned.len(), "Orphaned backups pruned");
        Ok(pruned)
    }
}
