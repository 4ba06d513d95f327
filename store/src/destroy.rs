//! DESTROY operation - before-destroy hooks, native dependents, removal.

use std::sync::Arc;

use restrict_core::{Record, RecordId, Value};
use restrict_registry::{
    AssociationKind, Dependent, Halt, HookContext, Reflection, Registry, TypeDef,
};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::Store;

/// How a destroy step ended when it did not fail.
enum Outcome {
    Proceed,
    Abort,
}

impl Store {
    /// Destroy a record by primary key.
    ///
    /// Returns `Ok(false)` when the destroy was rolled back without an
    /// error. See [`Store::destroy_record`].
    pub fn destroy(&mut self, type_name: &str, id: RecordId) -> StoreResult<bool> {
        let record = self.find(type_name, id)?;
        self.destroy_record(&record)
    }

    /// Destroy a record inside its own transaction level.
    ///
    /// Runs the before-destroy hooks of the record's type in registration
    /// order, then the native dependent options of its associations, then
    /// removes it. A hook halting with [`Halt::Rollback`] reverts
    /// everything and yields `Ok(false)`; a hook raising an error reverts
    /// everything and yields [`StoreError::Halted`].
    pub fn destroy_record(&mut self, record: &Record) -> StoreResult<bool> {
        let registry = Arc::clone(&self.registry);
        let type_def = registry
            .get_type(record.type_id)
            .ok_or_else(|| StoreError::UnknownType(record.type_id.to_string()))?;
        let record = self.reload(record)?;

        self.begin();
        match self.destroy_steps(&registry, type_def, &record) {
            Ok(Outcome::Proceed) => {
                self.commit()?;
                debug!(type_name = %type_def.name, id = %record.id, "record destroyed");
                Ok(true)
            }
            Ok(Outcome::Abort) => {
                self.rollback()?;
                Ok(false)
            }
            Err(error) => {
                self.rollback()?;
                Err(error)
            }
        }
    }

    /// Destroy every record of a type in primary key order, stopping at the
    /// first error. Returns the number destroyed.
    pub fn destroy_all(&mut self, type_name: &str) -> StoreResult<usize> {
        let mut destroyed = 0;
        for record in self.all(type_name)? {
            if self.destroy_record(&record)? {
                destroyed += 1;
            }
        }
        Ok(destroyed)
    }

    fn destroy_steps(
        &mut self,
        registry: &Registry,
        type_def: &TypeDef,
        record: &Record,
    ) -> StoreResult<Outcome> {
        for hook in &type_def.before_destroy {
            let ctx = HookContext {
                registry,
                reader: &*self,
                type_def,
            };
            match hook.before_destroy(&ctx, record) {
                Ok(()) => {}
                Err(Halt::Rollback) => {
                    info!(
                        type_name = %type_def.name,
                        id = %record.id,
                        hook = %hook.name(),
                        "destroy rolled back by hook"
                    );
                    return Ok(Outcome::Abort);
                }
                Err(Halt::Raise(error)) => {
                    info!(
                        type_name = %type_def.name,
                        id = %record.id,
                        hook = %hook.name(),
                        error = %error,
                        "destroy aborted by hook"
                    );
                    return Err(StoreError::Halted(error));
                }
            }
        }

        for reflection in &type_def.associations {
            if let Outcome::Abort = self.apply_dependent(reflection, record)? {
                return Ok(Outcome::Abort);
            }
        }

        self.remove(record.type_id, record.id)?;
        Ok(Outcome::Proceed)
    }

    /// Apply the native handling of one association of a destroyed record.
    fn apply_dependent(&mut self, reflection: &Reflection, record: &Record) -> StoreResult<Outcome> {
        if reflection.kind == AssociationKind::HasAndBelongsToMany {
            self.delete_join_rows(reflection, record)?;
            return Ok(Outcome::Proceed);
        }
        if reflection.internal && reflection.kind == AssociationKind::HasMany {
            for row in self.navigate(record, reflection)? {
                self.remove(row.type_id, row.id)?;
            }
            return Ok(Outcome::Proceed);
        }

        let Some(dependent) = reflection.dependent else {
            return Ok(Outcome::Proceed);
        };
        let dependents = self.navigate(record, reflection)?;
        if dependents.is_empty() {
            return Ok(Outcome::Proceed);
        }

        match dependent {
            Dependent::Destroy => {
                for row in &dependents {
                    if !self.destroy_record(row)? {
                        return Ok(Outcome::Abort);
                    }
                }
            }
            Dependent::DeleteAll => {
                for row in &dependents {
                    self.remove(row.type_id, row.id)?;
                }
            }
            Dependent::Nullify => {
                for row in &dependents {
                    self.update_attr(row, &reflection.foreign_key, Value::Null)?;
                }
            }
            Dependent::Rollback | Dependent::RestrictWithError => {
                debug!(association = %reflection.name, "destroy restricted by dependent option");
                return Ok(Outcome::Abort);
            }
            Dependent::Restrict | Dependent::RestrictWithException => {
                return Err(StoreError::restricted(
                    &reflection.owner_name,
                    &reflection.name,
                ));
            }
        }
        Ok(Outcome::Proceed)
    }

    fn delete_join_rows(&mut self, reflection: &Reflection, record: &Record) -> StoreResult<()> {
        let join = self.join_type(reflection)?;
        let rows: Vec<RecordId> = self
            .table(join)?
            .referencing(&reflection.foreign_key, record.id)
            .map(|row| row.id)
            .collect();
        for id in rows {
            self.remove(join, id)?;
        }
        Ok(())
    }
}
