//! The Store - tables, record operations and transactions.

use std::collections::HashMap;
use std::sync::Arc;

use restrict_core::{Attributes, Record, RecordId, TypeId, Value};
use restrict_registry::{Registry, TypeDef};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::table::Table;
use crate::transaction::{TransactionState, Undo, UndoLog};

/// In-memory persistence for the types of a registry.
///
/// Every type gets its own table with primary keys starting at 1.
/// Changes made inside a transaction are recorded in an undo log; nested
/// transactions are savepoints of the outermost one.
#[derive(Debug)]
pub struct Store {
    pub(crate) registry: Arc<Registry>,
    pub(crate) tables: HashMap<TypeId, Table>,
    log: UndoLog,
}

impl Store {
    /// Create an empty store with one table per registered type.
    pub fn new(registry: Arc<Registry>) -> Self {
        let tables = registry
            .all_types()
            .map(|t| (t.id, Table::new(t.id)))
            .collect();
        Self {
            registry,
            tables,
            log: UndoLog::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub(crate) fn type_def(&self, type_name: &str) -> StoreResult<&TypeDef> {
        self.registry
            .get_type_by_name(type_name)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))
    }

    pub(crate) fn table(&self, type_id: TypeId) -> StoreResult<&Table> {
        self.tables
            .get(&type_id)
            .ok_or_else(|| StoreError::UnknownType(type_id.to_string()))
    }

    pub(crate) fn type_name(&self, type_id: TypeId) -> String {
        self.registry
            .get_type(type_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| type_id.to_string())
    }

    fn table_mut(&mut self, type_id: TypeId) -> StoreResult<&mut Table> {
        self.tables
            .get_mut(&type_id)
            .ok_or_else(|| StoreError::UnknownType(type_id.to_string()))
    }

    // ==================== Records ====================

    /// Insert a record.
    pub fn create(&mut self, type_name: &str, attributes: Attributes) -> StoreResult<Record> {
        let type_id = self.type_def(type_name)?.id;
        let record = self.table_mut(type_id)?.insert(attributes);
        self.log.record(Undo::Inserted {
            type_id,
            id: record.id,
        });
        trace!(type_name, id = %record.id, "record created");
        Ok(record)
    }

    /// Get a record by primary key.
    pub fn get(&self, type_name: &str, id: RecordId) -> StoreResult<Option<&Record>> {
        let type_id = self.type_def(type_name)?.id;
        Ok(self.table(type_id)?.get(id))
    }

    /// Get a record by primary key, failing if it does not exist.
    pub fn find(&self, type_name: &str, id: RecordId) -> StoreResult<Record> {
        self.get(type_name, id)?
            .cloned()
            .ok_or_else(|| StoreError::record_not_found(type_name, id))
    }

    /// Fresh copy of a record.
    pub fn reload(&self, record: &Record) -> StoreResult<Record> {
        self.table(record.type_id)?
            .get(record.id)
            .cloned()
            .ok_or_else(|| StoreError::record_not_found(self.type_name(record.type_id), record.id))
    }

    /// Check whether a record still exists.
    pub fn exists(&self, record: &Record) -> bool {
        self.tables
            .get(&record.type_id)
            .is_some_and(|table| table.get(record.id).is_some())
    }

    /// Number of records of a type.
    pub fn count(&self, type_name: &str) -> StoreResult<usize> {
        let type_id = self.type_def(type_name)?.id;
        Ok(self.table(type_id)?.len())
    }

    /// All records of a type in primary key order.
    pub fn all(&self, type_name: &str) -> StoreResult<Vec<Record>> {
        let type_id = self.type_def(type_name)?.id;
        Ok(self.table(type_id)?.iter().cloned().collect())
    }

    /// Set an attribute of a stored record.
    pub fn update_attr(
        &mut self,
        record: &Record,
        attr: &str,
        value: impl Into<Value>,
    ) -> StoreResult<Record> {
        let type_name = self.type_name(record.type_id);
        let not_found = || StoreError::record_not_found(type_name, record.id);
        let stored = self
            .table_mut(record.type_id)?
            .get_mut(record.id)
            .ok_or_else(not_found)?;
        let previous = stored.set_attr(attr, value.into());
        let updated = stored.clone();
        self.log.record(Undo::Updated {
            type_id: record.type_id,
            id: record.id,
            attr: attr.to_string(),
            previous,
        });
        Ok(updated)
    }

    /// Remove a record without running hooks or dependents.
    pub(crate) fn remove(&mut self, type_id: TypeId, id: RecordId) -> StoreResult<Option<Record>> {
        let removed = self.table_mut(type_id)?.remove(id);
        if let Some(record) = &removed {
            self.log.record(Undo::Removed(record.clone()));
        }
        Ok(removed)
    }

    /// Remove every record of a type without running hooks or dependents.
    pub fn delete_all(&mut self, type_name: &str) -> StoreResult<usize> {
        let type_id = self.type_def(type_name)?.id;
        let ids: Vec<RecordId> = self.table(type_id)?.iter().map(|r| r.id).collect();
        for id in &ids {
            self.remove(type_id, *id)?;
        }
        Ok(ids.len())
    }

    // ==================== Transactions ====================

    pub fn state(&self) -> TransactionState {
        self.log.state()
    }

    pub fn in_transaction(&self) -> bool {
        self.state() == TransactionState::Active
    }

    /// Begin a transaction, or a savepoint if one is active.
    pub fn begin(&mut self) {
        self.log.begin();
    }

    /// Commit the innermost transaction level.
    pub fn commit(&mut self) -> StoreResult<()> {
        if self.log.commit() {
            Ok(())
        } else {
            Err(StoreError::NoActiveTransaction)
        }
    }

    /// Revert every change of the innermost transaction level.
    pub fn rollback(&mut self) -> StoreResult<()> {
        let undone = self.log.rollback().ok_or(StoreError::NoActiveTransaction)?;
        for undo in undone {
            self.revert(undo);
        }
        Ok(())
    }

    fn revert(&mut self, undo: Undo) {
        match undo {
            Undo::Inserted { type_id, id } => {
                if let Some(table) = self.tables.get_mut(&type_id) {
                    table.remove(id);
                }
            }
            Undo::Removed(record) => {
                if let Some(table) = self.tables.get_mut(&record.type_id) {
                    table.restore(record);
                }
            }
            Undo::Updated {
                type_id,
                id,
                attr,
                previous,
            } => {
                let stored = self
                    .tables
                    .get_mut(&type_id)
                    .and_then(|table| table.get_mut(id));
                if let Some(stored) = stored {
                    match previous {
                        Some(value) => {
                            stored.set_attr(attr, value);
                        }
                        None => {
                            stored.remove_attr(&attr);
                        }
                    }
                }
            }
        }
    }

    /// Run `f` in a transaction; commit on `Ok`, roll back on `Err`.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Store) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.begin();
        match f(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(error) => {
                self.rollback()?;
                Err(error)
            }
        }
    }
}
