//! Schema definition types.

use restrict_core::{Record, TypeId};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::DestroyHook;

/// Whether an association yields one record or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Collection,
}

/// The declaration verb an association was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

impl AssociationKind {
    /// Name of the declaration verb.
    pub fn macro_name(&self) -> &'static str {
        match self {
            AssociationKind::BelongsTo => "belongs_to",
            AssociationKind::HasOne => "has_one",
            AssociationKind::HasMany => "has_many",
            AssociationKind::HasAndBelongsToMany => "has_and_belongs_to_many",
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            AssociationKind::BelongsTo | AssociationKind::HasOne => Cardinality::Single,
            AssociationKind::HasMany | AssociationKind::HasAndBelongsToMany => {
                Cardinality::Collection
            }
        }
    }
}

/// Value of the `dependent` option of an association.
///
/// `Destroy`, `DeleteAll` and `Nullify` are applied by the persistence
/// layer itself. The four restrict kinds are what deletion guards enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependent {
    Destroy,
    DeleteAll,
    Nullify,
    Rollback,
    RestrictWithError,
    Restrict,
    RestrictWithException,
}

impl Dependent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependent::Destroy => "destroy",
            Dependent::DeleteAll => "delete_all",
            Dependent::Nullify => "nullify",
            Dependent::Rollback => "rollback",
            Dependent::RestrictWithError => "restrict_with_error",
            Dependent::Restrict => "restrict",
            Dependent::RestrictWithException => "restrict_with_exception",
        }
    }

    /// True for the four restrict/rollback kinds.
    pub fn is_restriction(&self) -> bool {
        matches!(
            self,
            Dependent::Rollback
                | Dependent::RestrictWithError
                | Dependent::Restrict
                | Dependent::RestrictWithException
        )
    }
}

impl fmt::Display for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dependent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches(':') {
            "destroy" => Ok(Dependent::Destroy),
            "delete_all" | "delete" => Ok(Dependent::DeleteAll),
            "nullify" => Ok(Dependent::Nullify),
            "rollback" => Ok(Dependent::Rollback),
            "restrict_with_error" => Ok(Dependent::RestrictWithError),
            "restrict" => Ok(Dependent::Restrict),
            "restrict_with_exception" => Ok(Dependent::RestrictWithException),
            other => Err(format!("unknown dependent option: {}", other)),
        }
    }
}

/// Filter applied to the records of a collection association.
pub type ScopeFn = fn(&Record) -> bool;

/// Named filter available on a collection association (`orders.active`).
#[derive(Clone)]
pub struct Scope {
    pub name: String,
    pub filter: ScopeFn,
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Options accepted by the association declaration verbs.
#[derive(Debug, Clone, Default)]
pub struct AssociationOptions {
    /// Target type name; derived from the association name when absent.
    pub class_name: Option<String>,
    /// Foreign key column; derived from the owner (or target for
    /// `belongs_to`) when absent.
    pub foreign_key: Option<String>,
    /// Association on the owner this one goes through.
    pub through: Option<String>,
    /// Association on the through target to collect records from.
    pub source: Option<String>,
    /// Join table of a `has_and_belongs_to_many` association.
    pub join_table: Option<String>,
    /// Deletion policy.
    pub dependent: Option<Dependent>,
    /// Extension scopes.
    pub scopes: Vec<Scope>,
    /// Helper association created by a rewrite, hidden from reflection listings.
    pub internal: bool,
}

impl AssociationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    pub fn through(mut self, association: impl Into<String>) -> Self {
        self.through = Some(association.into());
        self
    }

    pub fn source(mut self, association: impl Into<String>) -> Self {
        self.source = Some(association.into());
        self
    }

    pub fn join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table = Some(table.into());
        self
    }

    pub fn dependent(mut self, dependent: Dependent) -> Self {
        self.dependent = Some(dependent);
        self
    }

    /// Add an extension scope.
    pub fn scope(mut self, name: impl Into<String>, filter: ScopeFn) -> Self {
        self.scopes.push(Scope {
            name: name.into(),
            filter,
        });
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// Reflection metadata of a declared association.
#[derive(Debug, Clone)]
pub struct Reflection {
    /// Association name.
    pub name: String,
    /// Declaration verb.
    pub kind: AssociationKind,
    /// Owning type.
    pub owner: TypeId,
    /// Owning type name.
    pub owner_name: String,
    /// Target type name.
    pub class_name: String,
    /// Foreign key column. Lives on the owner for `belongs_to`, on the
    /// target for `has_one`/`has_many`, on the join table otherwise.
    pub foreign_key: String,
    /// Target-side key column of a join table.
    pub association_foreign_key: Option<String>,
    /// Join table of a `has_and_belongs_to_many` association.
    pub join_table: Option<String>,
    /// Association this one goes through.
    pub through: Option<String>,
    /// Source association on the through target.
    pub source: Option<String>,
    /// Deletion policy the persistence layer applies itself.
    pub dependent: Option<Dependent>,
    /// Extension scopes.
    pub scopes: Vec<Scope>,
    /// Hidden helper association.
    pub internal: bool,
}

impl Reflection {
    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality() == Cardinality::Collection
    }

    /// Get an extension scope by name.
    pub fn scope(&self, name: &str) -> Option<ScopeFn> {
        self.scopes
            .iter()
            .find(|scope| scope.name == name)
            .map(|scope| scope.filter)
    }
}

/// Entity type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Unique identifier.
    pub id: TypeId,
    /// Type name (`OrderInvoice`).
    pub name: String,
    /// Table name (`order_invoices`).
    pub table_name: String,
    /// Display template rendered for listings (`Order {id}`).
    pub display: Option<String>,
    /// Whether the type was synthesized for a join table.
    pub internal: bool,
    /// Associations in declaration order.
    pub associations: Vec<Reflection>,
    /// Before-destroy hooks in registration order.
    pub before_destroy: Vec<Arc<dyn DestroyHook>>,
}

impl TypeDef {
    pub fn new(id: TypeId, name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            table_name: table_name.into(),
            display: None,
            internal: false,
            associations: Vec::new(),
            before_destroy: Vec::new(),
        }
    }

    /// Get an association by name.
    pub fn get_association(&self, name: &str) -> Option<&Reflection> {
        self.associations.iter().find(|r| r.name == name)
    }

    /// Check if this type has a before-destroy hook with the given name.
    pub fn has_hook(&self, name: &str) -> bool {
        self.before_destroy.iter().any(|hook| hook.name() == name)
    }

    /// Human-readable representation of a record of this type.
    pub fn display(&self, record: &Record) -> String {
        match &self.display {
            Some(template) => record.render(template),
            None => format!("{} {}", self.name, record.id),
        }
    }
}
