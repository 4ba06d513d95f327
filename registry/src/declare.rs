//! The association declaration interface.
//!
//! [`Declarations`] is what a type definition talks to when it declares
//! associations. The [`SchemaBuilder`](crate::SchemaBuilder) implements it
//! directly; decorators implement it by wrapping another provider and
//! forwarding whatever they do not intercept.

use std::sync::Arc;

use restrict_core::TypeId;

use crate::{AssociationKind, AssociationOptions, DestroyHook, Reflection, RegistryResult};

/// What a declaration provider can reflect on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Guards can bind directly to a join-table (`has_and_belongs_to_many`)
    /// reflection.
    pub join_table_reflections: bool,
    /// `has_many` associations may go through another association.
    pub through_reflections: bool,
}

impl Capabilities {
    /// Join-table reflections are not exposed; many-to-many associations
    /// have to be expressed through a join entity.
    pub fn modern() -> Self {
        Self {
            join_table_reflections: false,
            through_reflections: true,
        }
    }

    /// Join-table reflections are exposed directly.
    pub fn legacy() -> Self {
        Self {
            join_table_reflections: true,
            through_reflections: true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::modern()
    }
}

/// Options of an entity type declaration.
#[derive(Debug, Clone, Default)]
pub struct TypeOptions {
    /// Table name; `tableize(name)` when absent.
    pub table_name: Option<String>,
    /// Display template, `{id}` and `{attr}` placeholders.
    pub display: Option<String>,
    /// Synthesized join entity.
    pub internal: bool,
}

impl TypeOptions {
    pub fn table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: Some(table_name.into()),
            ..Self::default()
        }
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }
}

/// Table name of the join table between two tables: both names sorted
/// lexically and joined with an underscore.
pub fn join_table_name(left: &str, right: &str) -> String {
    if left <= right {
        format!("{}_{}", left, right)
    } else {
        format!("{}_{}", right, left)
    }
}

/// A provider of association declarations.
pub trait Declarations {
    /// What this provider supports.
    fn capabilities(&self) -> Capabilities;

    /// Declare an entity type.
    fn declare_type(&mut self, name: &str, options: TypeOptions) -> RegistryResult<TypeId>;

    /// Check whether a type is declared.
    fn has_type(&self, name: &str) -> bool;

    /// Table name of a declared type.
    fn table_name(&self, type_name: &str) -> Option<String>;

    /// Name of the type stored in `table`.
    fn type_for_table(&self, table: &str) -> Option<String>;

    /// Reflection of an association declared so far.
    fn reflection(&self, owner: &str, name: &str) -> Option<Reflection>;

    fn belongs_to(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()>;

    fn has_one(&mut self, owner: &str, name: &str, options: AssociationOptions)
        -> RegistryResult<()>;

    fn has_many(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()>;

    fn has_and_belongs_to_many(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()>;

    /// Append a hook to the owner's before-destroy chain.
    fn before_destroy(&mut self, owner: &str, hook: Arc<dyn DestroyHook>) -> RegistryResult<()>;

    /// Check whether an association is declared.
    fn has_association(&self, owner: &str, name: &str) -> bool {
        self.reflection(owner, name).is_some()
    }

    /// Dispatch a declaration by kind.
    fn associate(
        &mut self,
        kind: AssociationKind,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        match kind {
            AssociationKind::BelongsTo => self.belongs_to(owner, name, options),
            AssociationKind::HasOne => self.has_one(owner, name, options),
            AssociationKind::HasMany => self.has_many(owner, name, options),
            AssociationKind::HasAndBelongsToMany => {
                self.has_and_belongs_to_many(owner, name, options)
            }
        }
    }

    /// Start declaring a type together with its associations.
    fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_, Self>
    where
        Self: Sized,
    {
        TypeBuilder {
            declarations: self,
            name: name.into(),
            options: TypeOptions::default(),
            associations: Vec::new(),
        }
    }
}

/// Builder for a type and its associations.
///
/// Nothing is declared until [`done`](TypeBuilder::done); associations are
/// then declared in the order they were added.
pub struct TypeBuilder<'a, D: Declarations> {
    declarations: &'a mut D,
    name: String,
    options: TypeOptions,
    associations: Vec<(AssociationKind, String, AssociationOptions)>,
}

impl<'a, D: Declarations> TypeBuilder<'a, D> {
    /// Set the table name.
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.options.table_name = Some(table_name.into());
        self
    }

    /// Set the display template.
    pub fn display(mut self, template: impl Into<String>) -> Self {
        self.options.display = Some(template.into());
        self
    }

    pub fn belongs_to(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.association(AssociationKind::BelongsTo, name, options)
    }

    pub fn has_one(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.association(AssociationKind::HasOne, name, options)
    }

    pub fn has_many(self, name: impl Into<String>, options: AssociationOptions) -> Self {
        self.association(AssociationKind::HasMany, name, options)
    }

    pub fn has_and_belongs_to_many(
        self,
        name: impl Into<String>,
        options: AssociationOptions,
    ) -> Self {
        self.association(AssociationKind::HasAndBelongsToMany, name, options)
    }

    fn association(
        mut self,
        kind: AssociationKind,
        name: impl Into<String>,
        options: AssociationOptions,
    ) -> Self {
        self.associations.push((kind, name.into(), options));
        self
    }

    /// Finish declaring this type.
    pub fn done(self) -> RegistryResult<TypeId> {
        let id = self.declarations.declare_type(&self.name, self.options)?;
        for (kind, name, options) in self.associations {
            self.declarations.associate(kind, &self.name, &name, options)?;
        }
        Ok(id)
    }
}
