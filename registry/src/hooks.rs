//! Before-destroy hooks and the association reads they rely on.

use std::error::Error;
use std::fmt;

use restrict_core::Record;

use crate::{ReadResult, Registry, TypeDef};

/// Why a before-destroy hook stopped a destroy.
#[derive(Debug)]
pub enum Halt {
    /// Roll the destroy back without surfacing an error.
    Rollback,
    /// Roll the destroy back and hand this error to the caller.
    Raise(Box<dyn Error + Send + Sync>),
}

impl Halt {
    pub fn raise(error: impl Error + Send + Sync + 'static) -> Self {
        Halt::Raise(Box::new(error))
    }
}

/// Everything a hook can see while a record is being destroyed.
pub struct HookContext<'a> {
    pub registry: &'a Registry,
    pub reader: &'a dyn AssociationReader,
    /// Type of the record being destroyed.
    pub type_def: &'a TypeDef,
}

/// A hook run before a record is destroyed, inside the destroy's
/// transaction.
pub trait DestroyHook: fmt::Debug + Send + Sync {
    /// Unique name within the owning type.
    fn name(&self) -> &str;

    /// Inspect `record`; any `Err` stops the hook chain and the destroy.
    fn before_destroy(&self, ctx: &HookContext<'_>, record: &Record) -> Result<(), Halt>;
}

/// Navigation of the associations of a live record.
///
/// Collections come back in primary key order.
pub trait AssociationReader {
    /// Records of `association`, at most `limit` of them.
    fn fetch(
        &self,
        owner: &Record,
        association: &str,
        limit: Option<usize>,
    ) -> ReadResult<Vec<Record>>;

    /// Number of records of `association`.
    fn count(&self, owner: &Record, association: &str) -> ReadResult<usize>;

    /// Whether `association` holds at least one record.
    fn exists(&self, owner: &Record, association: &str) -> ReadResult<bool> {
        Ok(self.count(owner, association)? > 0)
    }
}
