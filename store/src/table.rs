//! Per-type record tables.

use std::collections::BTreeMap;

use restrict_core::{Attributes, Record, RecordId, TypeId};

/// Records of one type, ordered by primary key.
#[derive(Debug, Clone)]
pub struct Table {
    type_id: TypeId,
    /// Next primary key; keys are never reused, even after a rollback.
    next_id: u64,
    rows: BTreeMap<RecordId, Record>,
}

impl Table {
    pub fn new(type_id: TypeId) -> Self {
        Self {
            type_id,
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    /// Insert a new record with the next primary key.
    pub fn insert(&mut self, attributes: Attributes) -> Record {
        let id = RecordId::new(self.next_id);
        self.next_id += 1;
        let record = Record::new(id, self.type_id, attributes);
        self.rows.insert(id, record.clone());
        record
    }

    /// Put a record back, keeping its primary key.
    pub fn restore(&mut self, record: Record) {
        self.rows.insert(record.id, record);
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.rows.get_mut(&id)
    }

    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        self.rows.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in primary key order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.rows.values()
    }

    /// Records whose `column` references `target`, in primary key order.
    pub fn referencing(&self, column: &str, target: RecordId) -> impl Iterator<Item = &Record> {
        let column = column.to_string();
        self.rows
            .values()
            .filter(move |record| record.references(&column, target))
    }
}
