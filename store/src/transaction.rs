//! Undo log backing transactions and savepoints.

use restrict_core::{Record, RecordId, TypeId, Value};

/// A change that can be reverted.
#[derive(Debug, Clone)]
pub enum Undo {
    /// A record was inserted.
    Inserted { type_id: TypeId, id: RecordId },
    /// A record was removed.
    Removed(Record),
    /// An attribute was changed; `previous` is `None` if it was unset.
    Updated {
        type_id: TypeId,
        id: RecordId,
        attr: String,
        previous: Option<Value>,
    },
}

/// Transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction is active.
    Inactive,
    /// A transaction is active, possibly with nested savepoints.
    Active,
}

/// Changes recorded since the outermost transaction began.
///
/// Every `begin` pushes a savepoint at the current log length. Committing
/// the outermost level discards the log; committing a nested level only
/// releases its savepoint.
#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<Undo>,
    savepoints: Vec<usize>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransactionState {
        if self.savepoints.is_empty() {
            TransactionState::Inactive
        } else {
            TransactionState::Active
        }
    }

    /// Record a change; ignored outside a transaction.
    pub fn record(&mut self, undo: Undo) {
        if !self.savepoints.is_empty() {
            self.entries.push(undo);
        }
    }

    pub fn begin(&mut self) {
        self.savepoints.push(self.entries.len());
    }

    /// Release the innermost level. Returns false if none is open.
    pub fn commit(&mut self) -> bool {
        if self.savepoints.pop().is_none() {
            return false;
        }
        if self.savepoints.is_empty() {
            self.entries.clear();
        }
        true
    }

    /// Close the innermost level and return its changes, newest first.
    pub fn rollback(&mut self) -> Option<Vec<Undo>> {
        let mark = self.savepoints.pop()?;
        let mut undone = self.entries.split_off(mark);
        undone.reverse();
        Some(undone)
    }
}
