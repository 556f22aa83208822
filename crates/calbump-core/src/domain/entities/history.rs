//! Bounded, append-only log of finalized operations.

use std::collections::VecDeque;

use super::operation::{Operation, OperationId};

/// Number of operations kept unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A ring of at most `capacity` operations, oldest first.
///
/// Pushing past capacity evicts whole operations from the front; the
/// evicted records are handed back so their backups can be released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    capacity: usize,
    operations: VecDeque<Operation>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            operations: VecDeque::with_capacity(capacity),
        }
    }

    /// Rebuild from persisted records (oldest first). Records beyond
    /// `capacity` are evicted and returned.
    pub fn from_records(capacity: usize, records: Vec<Operation>) -> (Self, Vec<Operation>) {
        let mut history = Self::new(capacity);
        let mut evicted = Vec::new();
        for record in records {
            evicted.extend(history.push(record));
        }
        (history, evicted)
    }

    /// Append `operation`, returning whatever fell off the front.
    pub fn push(&mut self, operation: Operation) -> Vec<Operation> {
        let mut evicted = Vec::new();
        while self.operations.len() >= self.capacity {
            if let Some(oldest) = self.operations.pop_front() {
                evicted.push(oldest);
            }
        }
        self.operations.push_back(operation);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, id: &OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| &op.id == id)
    }

    pub fn latest(&self) -> Option<&Operation> {
        self.operations.back()
    }

    /// Most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().rev()
    }

    /// Oldest first, the persisted order.
    pub fn records(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &OperationId> {
        self.operations.iter().map(|op| &op.id)
    }

    pub fn contains(&self, id: &OperationId) -> bool {
        self.get(id).is_some()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn op(n: u32) -> Operation {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, n).unwrap();
        Operation {
            id: OperationId::generate(now, []),
            created_at: now,
            version: format!("2025.01.01.{n}"),
            files: Vec::new(),
            git: None,
        }
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut history = History::new(3);
        for n in 1..=3 {
            assert!(history.push(op(n)).is_empty());
        }
        let evicted = history.push(op(4));
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].version, "2025.01.01.1");
        assert_eq!(history.len(), 3);

        let versions: Vec<_> = history.records().map(|o| o.version.as_str()).collect();
        assert_eq!(versions, ["2025.01.01.2", "2025.01.01.3", "2025.01.01.4"]);
    }

    #[test]
    fn latest_and_recent_order() {
        let mut history = History::default();
        history.push(op(1));
        history.push(op(2));
        assert_eq!(history.latest().unwrap().version, "2025.01.01.2");
        let recent: Vec<_> = history.recent().map(|o| o.version.as_str()).collect();
        assert_eq!(recent, ["2025.01.01.2", "2025.01.01.1"]);
        assert_eq!(history.capacity(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn from_records_applies_a_smaller_limit() {
        let (history, evicted) = History::from_records(2, (1..=5).map(op).collect());
        assert_eq!(history.len(), 2);
        assert_eq!(evicted.len(), 3);
        assert_eq!(history.latest().unwrap().version, "2025.01.01.5");
    }

    #[test]
    fn lookup_by_id() {
        let mut history = History::new(5);
        let first = op(1);
        let id = first.id.clone();
        history.push(first);
        assert!(history.contains(&id));
        assert!(history.get(&id).is_some());
        assert!(History::new(0).is_empty());
    }
}
