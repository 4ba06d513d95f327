//! Installs deletion guards while associations are declared.

use std::sync::Arc;

use restrict_core::TypeId;
use restrict_i18n::{inflector, Catalog};
use restrict_registry::{
    join_table_name, AssociationKind, AssociationOptions, Capabilities, Declarations,
    DestroyHook, Reflection, Registry, RegistryError, RegistryResult, SchemaBuilder, TypeOptions,
};
use tracing::debug;

use crate::{DeletionGuard, DeletionPolicy};

/// Registrar configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictOptions {
    /// Rewrite guarded `has_and_belongs_to_many` associations as
    /// `has_many :through` a join entity when the wrapped provider cannot
    /// reflect on join tables. When off, such declarations are rejected.
    pub rewrite_join_tables: bool,
}

impl Default for RestrictOptions {
    fn default() -> Self {
        Self {
            rewrite_join_tables: true,
        }
    }
}

/// Declaration provider that guards restricted associations.
///
/// `has_one`, `has_many` and `has_and_belongs_to_many` declarations whose
/// `dependent` option is `rollback`, `restrict_with_error`, `restrict` or
/// `restrict_with_exception` get a [`DeletionGuard`] in the owner's
/// before-destroy chain and are forwarded without the option. Everything
/// else is forwarded to the wrapped provider unchanged.
#[derive(Debug)]
pub struct RestrictDeclarations<D> {
    inner: D,
    catalog: Arc<Catalog>,
    options: RestrictOptions,
}

impl<D: Declarations> RestrictDeclarations<D> {
    pub fn new(inner: D, catalog: Arc<Catalog>) -> Self {
        Self {
            inner,
            catalog,
            options: RestrictOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RestrictOptions) -> Self {
        self.options = options;
        self
    }

    fn declare(
        &mut self,
        kind: AssociationKind,
        owner: &str,
        name: &str,
        mut options: AssociationOptions,
    ) -> RegistryResult<()> {
        let policy = DeletionPolicy::resolve(options.dependent);
        if !policy.is_guarded() {
            debug!(owner = %owner, association = %name, "association passed through");
            return self.inner.associate(kind, owner, name, options);
        }

        options.dependent = None;
        let via_join_entity = kind == AssociationKind::HasAndBelongsToMany
            && !self.inner.capabilities().join_table_reflections;
        if via_join_entity {
            self.declare_through_join_entity(owner, name, options)?;
        } else {
            self.inner.associate(kind, owner, name, options)?;
        }

        let reflection = self.resolve(owner, name)?;
        let guard = DeletionGuard::new(
            reflection.name.as_str(),
            reflection.cardinality(),
            policy,
            Arc::clone(&self.catalog),
        );
        debug!(
            owner = %owner,
            association = %name,
            policy = %policy,
            hook = %guard.name(),
            "deletion guard registered"
        );
        self.inner.before_destroy(owner, Arc::new(guard))
    }

    fn resolve(&self, owner: &str, name: &str) -> RegistryResult<Reflection> {
        self.inner.reflection(owner, name).ok_or_else(|| {
            RegistryError::invalid_options(
                name,
                format!("{} did not expose a reflection for {}", owner, name),
            )
        })
    }

    /// Declare a guarded many-to-many association as `has_many :through`
    /// the join entity of its join table.
    fn declare_through_join_entity(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        let capabilities = self.inner.capabilities();
        if !self.options.rewrite_join_tables || !capabilities.through_reflections {
            return Err(RegistryError::unsupported(format!(
                "{}.{}: dependent restrictions do not work with has_and_belongs_to_many here; \
                 declare has_many :{} through a join entity instead",
                owner, name, name
            )));
        }

        let class_name = options
            .class_name
            .clone()
            .unwrap_or_else(|| inflector::classify(name));
        let owner_table = self
            .inner
            .table_name(owner)
            .ok_or_else(|| RegistryError::UnknownType(owner.to_string()))?;
        let target_table = self
            .inner
            .table_name(&class_name)
            .unwrap_or_else(|| inflector::tableize(&class_name));
        let join_table = options
            .join_table
            .clone()
            .unwrap_or_else(|| join_table_name(&owner_table, &target_table));

        let join_type = match self.inner.type_for_table(&join_table) {
            Some(existing) => existing,
            None => {
                let join_type = inflector::classify(&join_table);
                self.inner
                    .declare_type(&join_type, TypeOptions::table(join_table.as_str()).internal())?;
                join_type
            }
        };

        let source = inflector::underscore(&class_name);
        if !self.inner.has_association(&join_type, &source) {
            self.inner.belongs_to(
                &join_type,
                &source,
                AssociationOptions::new()
                    .class_name(class_name.as_str())
                    .internal(),
            )?;
        }

        let mut join_rows = AssociationOptions::new()
            .class_name(join_type.as_str())
            .internal();
        if let Some(foreign_key) = &options.foreign_key {
            join_rows = join_rows.foreign_key(foreign_key.as_str());
        }
        if !self.inner.has_association(owner, &join_table) {
            self.inner.has_many(owner, &join_table, join_rows)?;
        }

        debug!(
            owner = %owner,
            association = %name,
            join_table = %join_table,
            "join-table association declared through join entity"
        );
        self.inner.has_many(
            owner,
            name,
            AssociationOptions {
                class_name: Some(class_name),
                through: Some(join_table),
                source: Some(source),
                scopes: options.scopes,
                ..AssociationOptions::default()
            },
        )
    }
}

impl RestrictDeclarations<SchemaBuilder> {
    /// Build the registry of the wrapped schema builder.
    pub fn build(self) -> RegistryResult<Registry> {
        self.inner.build()
    }
}

impl<D: Declarations> Declarations for RestrictDeclarations<D> {
    fn capabilities(&self) -> Capabilities {
        self.inner.capabilities()
    }

    fn declare_type(&mut self, name: &str, options: TypeOptions) -> RegistryResult<TypeId> {
        self.inner.declare_type(name, options)
    }

    fn has_type(&self, name: &str) -> bool {
        self.inner.has_type(name)
    }

    fn table_name(&self, type_name: &str) -> Option<String> {
        self.inner.table_name(type_name)
    }

    fn type_for_table(&self, table: &str) -> Option<String> {
        self.inner.type_for_table(table)
    }

    fn reflection(&self, owner: &str, name: &str) -> Option<Reflection> {
        self.inner.reflection(owner, name)
    }

    fn belongs_to(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.inner.belongs_to(owner, name, options)
    }

    fn has_one(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.declare(AssociationKind::HasOne, owner, name, options)
    }

    fn has_many(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.declare(AssociationKind::HasMany, owner, name, options)
    }

    fn has_and_belongs_to_many(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.declare(AssociationKind::HasAndBelongsToMany, owner, name, options)
    }

    fn before_destroy(&mut self, owner: &str, hook: Arc<dyn DestroyHook>) -> RegistryResult<()> {
        self.inner.before_destroy(owner, hook)
    }
}
