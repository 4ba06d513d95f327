//! The before-destroy hook bound to one guarded association.

use std::sync::Arc;

use restrict_core::Record;
use restrict_i18n::Catalog;
use restrict_registry::{Cardinality, DestroyHook, Halt, HookContext, ReadResult};
use tracing::debug;

use crate::{DeleteRestrictionError, DeletionPolicy, SAMPLE_LIMIT};

/// Checks one association before its owner is destroyed.
#[derive(Debug)]
pub struct DeletionGuard {
    name: String,
    association: String,
    cardinality: Cardinality,
    policy: DeletionPolicy,
    catalog: Arc<Catalog>,
}

impl DeletionGuard {
    pub fn new(
        association: impl Into<String>,
        cardinality: Cardinality,
        policy: DeletionPolicy,
        catalog: Arc<Catalog>,
    ) -> Self {
        let association = association.into();
        Self {
            name: policy.hook_name(&association),
            association,
            cardinality,
            policy,
            catalog,
        }
    }

    pub fn association(&self) -> &str {
        &self.association
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn policy(&self) -> DeletionPolicy {
        self.policy
    }

    fn has_dependents(&self, ctx: &HookContext<'_>, record: &Record) -> ReadResult<bool> {
        match self.cardinality {
            Cardinality::Single => Ok(!ctx
                .reader
                .fetch(record, &self.association, Some(1))?
                .is_empty()),
            Cardinality::Collection => ctx.reader.exists(record, &self.association),
        }
    }

    fn restriction(
        &self,
        ctx: &HookContext<'_>,
        record: &Record,
    ) -> ReadResult<DeleteRestrictionError> {
        let count = ctx.reader.count(record, &self.association)?;
        let samples = ctx
            .reader
            .fetch(record, &self.association, Some(SAMPLE_LIMIT))?
            .iter()
            .map(|dependent| ctx.registry.display(dependent))
            .collect();
        Ok(DeleteRestrictionError::new(
            self.association.clone(),
            record.clone(),
            count,
            samples,
            Arc::clone(&self.catalog),
        ))
    }
}

impl DestroyHook for DeletionGuard {
    fn name(&self) -> &str {
        &self.name
    }

    fn before_destroy(&self, ctx: &HookContext<'_>, record: &Record) -> Result<(), Halt> {
        if !self.has_dependents(ctx, record).map_err(Halt::raise)? {
            return Ok(());
        }

        debug!(
            owner = %ctx.type_def.name,
            id = %record.id,
            association = %self.association,
            policy = %self.policy,
            "destroy halted by dependents"
        );

        if self.policy.is_silent() {
            return Err(Halt::Rollback);
        }
        let error = self.restriction(ctx, record).map_err(Halt::raise)?;
        Err(Halt::raise(error))
    }
}
