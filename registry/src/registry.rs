//! The Registry - immutable schema lookup.

use std::collections::HashMap;
use std::sync::Arc;

use restrict_core::{Record, TypeId};

use crate::{DestroyHook, ReadError, ReadResult, Reflection, TypeDef};

/// The Registry provides runtime lookup of schema definitions.
/// It is immutable after construction.
#[derive(Debug)]
pub struct Registry {
    /// Type definitions indexed by type id.
    types: Vec<TypeDef>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,
    /// Type ID lookup by table name.
    table_names: HashMap<String, TypeId>,
}

impl Registry {
    /// Use SchemaBuilder for construction.
    pub(crate) fn new(
        types: Vec<TypeDef>,
        type_names: HashMap<String, TypeId>,
        table_names: HashMap<String, TypeId>,
    ) -> Self {
        Self {
            types,
            type_names,
            table_names,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.type_names.get(name).and_then(|id| self.get_type(*id))
    }

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(id.raw() as usize)
    }

    /// Get a type ID by name.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Get the type stored in a table.
    pub fn type_by_table(&self, table: &str) -> Option<&TypeDef> {
        self.table_names.get(table).and_then(|id| self.get_type(*id))
    }

    /// Get all type definitions in declaration order.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }

    // ==================== Reflection ====================

    /// Public associations of a type in declaration order.
    ///
    /// Helper associations created for join entities are left out.
    pub fn reflect_on_all_associations(&self, type_name: &str) -> ReadResult<Vec<&Reflection>> {
        let type_def = self
            .get_type_by_name(type_name)
            .ok_or_else(|| ReadError::UnknownType(type_name.to_string()))?;
        Ok(type_def
            .associations
            .iter()
            .filter(|r| !r.internal)
            .collect())
    }

    /// Reflection of a single association, hidden ones included.
    pub fn reflect_on_association(&self, type_name: &str, name: &str) -> Option<&Reflection> {
        self.get_type_by_name(type_name)?.get_association(name)
    }

    /// Target type of an association.
    pub fn target(&self, reflection: &Reflection) -> Option<&TypeDef> {
        self.get_type_by_name(&reflection.class_name)
    }

    // ==================== Hooks ====================

    /// Before-destroy hooks of a type, in registration order.
    pub fn before_destroy(&self, type_id: TypeId) -> &[Arc<dyn DestroyHook>] {
        self.get_type(type_id)
            .map(|t| t.before_destroy.as_slice())
            .unwrap_or(&[])
    }

    /// Human-readable representation of a record.
    pub fn display(&self, record: &Record) -> String {
        match self.get_type(record.type_id) {
            Some(type_def) => type_def.display(record),
            None => format!("{} {}", record.type_id, record.id),
        }
    }
}
