//! Association navigation over stored records.

use std::collections::BTreeMap;

use restrict_core::{attrs, Record, RecordId, TypeId, Value};
use restrict_i18n::inflector;
use restrict_registry::{
    AssociationKind, AssociationReader, ReadError, ReadResult, Reflection, TypeDef,
};

use crate::error::{StoreError, StoreResult};
use crate::Store;

impl Store {
    fn owner_type(&self, record: &Record) -> ReadResult<&TypeDef> {
        self.registry
            .get_type(record.type_id)
            .ok_or_else(|| ReadError::UnknownType(record.type_id.to_string()))
    }

    pub(crate) fn reflection_of(&self, owner: &Record, name: &str) -> ReadResult<&Reflection> {
        let type_def = self.owner_type(owner)?;
        type_def
            .get_association(name)
            .ok_or_else(|| ReadError::unknown_association(&type_def.name, name))
    }

    fn type_id_of(&self, class_name: &str) -> ReadResult<TypeId> {
        self.registry
            .get_type_id(class_name)
            .ok_or_else(|| ReadError::UnknownType(class_name.to_string()))
    }

    fn rows(&self, type_id: TypeId) -> impl Iterator<Item = &Record> {
        self.tables.get(&type_id).into_iter().flat_map(|t| t.iter())
    }

    fn row(&self, type_id: TypeId, id: RecordId) -> Option<&Record> {
        self.tables.get(&type_id).and_then(|t| t.get(id))
    }

    /// Source association of a `through` reflection, looked up on the
    /// through target by the explicit source name, then by the singular
    /// and plural forms of the association name.
    fn source_of<'r>(
        &'r self,
        reflection: &Reflection,
        through: &Reflection,
    ) -> ReadResult<&'r Reflection> {
        let through_name = through.name.as_str();
        let unresolved =
            || ReadError::unresolved_source(&reflection.owner_name, &reflection.name, through_name);
        let intermediate = self
            .registry
            .target(through)
            .ok_or_else(unresolved)?;

        let candidates = match &reflection.source {
            Some(source) => vec![source.clone()],
            None => vec![
                inflector::singularize(&reflection.name),
                reflection.name.clone(),
            ],
        };
        candidates
            .iter()
            .find_map(|name| intermediate.get_association(name))
            .ok_or_else(unresolved)
    }

    /// Records of an association in primary key order.
    pub(crate) fn navigate(&self, owner: &Record, reflection: &Reflection) -> ReadResult<Vec<Record>> {
        if let Some(through_name) = &reflection.through {
            let through = self.reflection_of(owner, through_name)?;
            let source = self.source_of(reflection, through)?;
            let mut collected = BTreeMap::new();
            for intermediate in self.navigate(owner, through)? {
                for record in self.navigate(&intermediate, source)? {
                    collected.insert(record.id, record);
                }
            }
            return Ok(collected.into_values().collect());
        }

        let target = self.type_id_of(&reflection.class_name)?;
        let records = match reflection.kind {
            AssociationKind::BelongsTo => owner
                .foreign_key(&reflection.foreign_key)
                .and_then(|id| self.row(target, id))
                .cloned()
                .into_iter()
                .collect(),
            AssociationKind::HasOne => self
                .rows(target)
                .find(|r| r.references(&reflection.foreign_key, owner.id))
                .cloned()
                .into_iter()
                .collect(),
            AssociationKind::HasMany => self
                .rows(target)
                .filter(|r| r.references(&reflection.foreign_key, owner.id))
                .cloned()
                .collect(),
            AssociationKind::HasAndBelongsToMany => {
                let join = self.join_type(reflection)?;
                let target_key = reflection
                    .association_foreign_key
                    .as_deref()
                    .unwrap_or_default();
                let mut collected = BTreeMap::new();
                for row in self
                    .rows(join)
                    .filter(|r| r.references(&reflection.foreign_key, owner.id))
                {
                    if let Some(record) = row
                        .foreign_key(target_key)
                        .and_then(|id| self.row(target, id))
                    {
                        collected.insert(record.id, record.clone());
                    }
                }
                collected.into_values().collect()
            }
        };
        Ok(records)
    }

    /// Type stored in the join table of a join-table reflection.
    pub(crate) fn join_type(&self, reflection: &Reflection) -> ReadResult<TypeId> {
        let table = reflection.join_table.as_deref().unwrap_or_default();
        self.registry
            .type_by_table(table)
            .map(|t| t.id)
            .ok_or_else(|| ReadError::UnknownType(table.to_string()))
    }

    // ==================== Convenience ====================

    /// Records of `association` of `owner`.
    pub fn association(&self, owner: &Record, association: &str) -> StoreResult<Vec<Record>> {
        Ok(self.fetch(owner, association, None)?)
    }

    /// Records of `association` of `owner` kept by the named scope.
    pub fn scoped(
        &self,
        owner: &Record,
        association: &str,
        scope: &str,
    ) -> StoreResult<Vec<Record>> {
        let reflection = self.reflection_of(owner, association)?;
        let filter = reflection
            .scope(scope)
            .ok_or_else(|| StoreError::unknown_scope(association, scope))?;
        Ok(self
            .navigate(owner, reflection)?
            .into_iter()
            .filter(|record| filter(record))
            .collect())
    }

    /// Associate `target` with `owner` through `association`.
    ///
    /// Sets the foreign key for direct associations and inserts a join row
    /// for join-table associations and `has_many :through` a join entity.
    pub fn link(&mut self, owner: &Record, association: &str, target: &Record) -> StoreResult<()> {
        let reflection = self.reflection_of(owner, association)?.clone();
        let unlinkable =
            |message: &str| StoreError::unlinkable(&reflection.owner_name, association, message);

        if let Some(through_name) = &reflection.through {
            let through = self.reflection_of(owner, through_name)?.clone();
            let source = self.source_of(&reflection, &through)?.clone();
            if through.kind != AssociationKind::HasMany
                || through.through.is_some()
                || source.kind != AssociationKind::BelongsTo
            {
                return Err(unlinkable("only has_many through a join entity can be linked"));
            }
            self.create(
                &through.class_name,
                attrs! {
                    through.foreign_key.as_str() => owner.id,
                    source.foreign_key.as_str() => target.id,
                },
            )?;
            return Ok(());
        }

        match reflection.kind {
            AssociationKind::BelongsTo => {
                self.update_attr(owner, &reflection.foreign_key, Value::Ref(target.id))?;
            }
            AssociationKind::HasOne | AssociationKind::HasMany => {
                self.update_attr(target, &reflection.foreign_key, Value::Ref(owner.id))?;
            }
            AssociationKind::HasAndBelongsToMany => {
                let join = self.join_type(&reflection)?;
                let join_name = self.type_name(join);
                let target_key = reflection
                    .association_foreign_key
                    .clone()
                    .ok_or_else(|| unlinkable("missing association foreign key"))?;
                self.create(
                    &join_name,
                    attrs! {
                        reflection.foreign_key.as_str() => owner.id,
                        target_key.as_str() => target.id,
                    },
                )?;
            }
        }
        Ok(())
    }
}

impl AssociationReader for Store {
    fn fetch(
        &self,
        owner: &Record,
        association: &str,
        limit: Option<usize>,
    ) -> ReadResult<Vec<Record>> {
        let reflection = self.reflection_of(owner, association)?;
        let mut records = self.navigate(owner, reflection)?;
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    fn count(&self, owner: &Record, association: &str) -> ReadResult<usize> {
        let reflection = self.reflection_of(owner, association)?;
        Ok(self.navigate(owner, reflection)?.len())
    }
}
