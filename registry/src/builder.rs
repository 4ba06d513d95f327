//! SchemaBuilder for constructing an immutable Registry.

use std::collections::HashMap;
use std::sync::Arc;

use restrict_core::TypeId;
use restrict_i18n::inflector;
use tracing::debug;

use crate::declare::TypeOptions;
use crate::{
    join_table_name, AssociationKind, AssociationOptions, Capabilities, Declarations, DestroyHook,
    Reflection, Registry, RegistryError, RegistryResult, TypeDef,
};

/// The base declaration provider.
///
/// Associations are recorded as declared, including their `dependent`
/// option, which the persistence layer applies natively.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    capabilities: Capabilities,
    /// Types being built, indexed by type id.
    types: Vec<TypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
    /// Table name to ID mapping.
    table_names: HashMap<String, TypeId>,
}

impl SchemaBuilder {
    /// Create a new builder with modern capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.type_names
            .get(name)
            .map(|id| &self.types[id.raw() as usize])
    }

    fn type_def_mut(&mut self, name: &str) -> RegistryResult<&mut TypeDef> {
        let id = self
            .type_names
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))?;
        Ok(&mut self.types[id.raw() as usize])
    }

    fn insert_type(&mut self, name: &str, options: TypeOptions) -> RegistryResult<TypeId> {
        let table = options
            .table_name
            .unwrap_or_else(|| inflector::tableize(name));
        if self.table_names.contains_key(&table) {
            return Err(RegistryError::DuplicateTableName(table));
        }

        let id = TypeId::new(self.types.len() as u32);
        let mut type_def = TypeDef::new(id, name, table.clone());
        type_def.display = options.display;
        type_def.internal = options.internal;

        self.types.push(type_def);
        self.type_names.insert(name.to_string(), id);
        self.table_names.insert(table, id);
        Ok(id)
    }

    /// Table of `class_name`, by convention when it is not declared yet.
    fn target_table(&self, class_name: &str) -> String {
        self.table_name(class_name)
            .unwrap_or_else(|| inflector::tableize(class_name))
    }

    fn reflect(
        &self,
        kind: AssociationKind,
        owner: &TypeDef,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<Reflection> {
        if options.through.is_some() && kind != AssociationKind::HasMany {
            return Err(RegistryError::invalid_options(
                name,
                format!("{} cannot go through another association", kind.macro_name()),
            ));
        }
        if options.join_table.is_some() && kind != AssociationKind::HasAndBelongsToMany {
            return Err(RegistryError::invalid_options(
                name,
                "join_table only applies to has_and_belongs_to_many",
            ));
        }
        if options.through.is_some() && !self.capabilities.through_reflections {
            return Err(RegistryError::unsupported(format!(
                "{}.{}: this provider does not support has_many :through",
                owner.name, name
            )));
        }
        if let Some(dependent) = options.dependent {
            let supported = match kind {
                AssociationKind::BelongsTo | AssociationKind::HasAndBelongsToMany => false,
                AssociationKind::HasMany if options.through.is_some() => {
                    dependent.is_restriction()
                }
                AssociationKind::HasOne | AssociationKind::HasMany => true,
            };
            if !supported {
                return Err(RegistryError::invalid_options(
                    name,
                    format!(
                        "{} does not support dependent: {}",
                        kind.macro_name(),
                        dependent
                    ),
                ));
            }
        }

        let class_name = options.class_name.unwrap_or_else(|| match kind {
            AssociationKind::BelongsTo | AssociationKind::HasOne => inflector::camelize(name),
            AssociationKind::HasMany | AssociationKind::HasAndBelongsToMany => {
                inflector::classify(name)
            }
        });
        let foreign_key = options.foreign_key.unwrap_or_else(|| match kind {
            AssociationKind::BelongsTo => format!("{}_id", name),
            _ => inflector::foreign_key(&owner.name),
        });

        let (association_foreign_key, join_table) = match kind {
            AssociationKind::HasAndBelongsToMany => {
                let join_table = options.join_table.unwrap_or_else(|| {
                    join_table_name(&owner.table_name, &self.target_table(&class_name))
                });
                (Some(inflector::foreign_key(&class_name)), Some(join_table))
            }
            _ => (None, None),
        };

        Ok(Reflection {
            name: name.to_string(),
            kind,
            owner: owner.id,
            owner_name: owner.name.clone(),
            class_name,
            foreign_key,
            association_foreign_key,
            join_table,
            through: options.through,
            source: options.source,
            dependent: options.dependent,
            scopes: options.scopes,
            internal: options.internal,
        })
    }

    fn add_association(
        &mut self,
        kind: AssociationKind,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        let owner_def = self
            .type_def(owner)
            .ok_or_else(|| RegistryError::UnknownType(owner.to_string()))?;
        // An explicit declaration takes over an internal one of the same name.
        let replaces = match owner_def.get_association(name) {
            Some(existing) if existing.internal && !options.internal => true,
            Some(_) => return Err(RegistryError::duplicate_association(owner, name)),
            None => false,
        };

        let reflection = self.reflect(kind, owner_def, name, options)?;
        debug!(
            owner = %owner,
            association = %name,
            kind = kind.macro_name(),
            target = %reflection.class_name,
            replaces,
            "association declared"
        );
        let associations = &mut self.type_def_mut(owner)?.associations;
        match associations.iter().position(|r| r.name == name) {
            Some(index) if replaces => associations[index] = reflection,
            _ => associations.push(reflection),
        }
        Ok(())
    }

    /// Synthesize join types for join tables no declared type is stored in.
    fn ensure_join_types(&mut self) -> RegistryResult<()> {
        let join_tables: Vec<String> = self
            .types
            .iter()
            .flat_map(|t| t.associations.iter())
            .filter_map(|r| r.join_table.clone())
            .collect();

        for table in join_tables {
            if self.table_names.contains_key(&table) {
                continue;
            }
            let name = inflector::classify(&table);
            if self.type_names.contains_key(&name) {
                return Err(RegistryError::DuplicateTypeName(name));
            }
            debug!(join_type = %name, table = %table, "join type synthesized");
            self.insert_type(&name, TypeOptions::table(table).internal())?;
        }
        Ok(())
    }

    fn validate(&self) -> RegistryResult<()> {
        for type_def in &self.types {
            for reflection in &type_def.associations {
                if !self.type_names.contains_key(&reflection.class_name) {
                    return Err(RegistryError::UnknownTarget {
                        owner: type_def.name.clone(),
                        association: reflection.name.clone(),
                        class_name: reflection.class_name.clone(),
                    });
                }
                if let Some(through) = &reflection.through {
                    let valid = type_def
                        .get_association(through)
                        .is_some_and(|r| r.name != reflection.name);
                    if !valid {
                        return Err(RegistryError::UnknownThrough {
                            owner: type_def.name.clone(),
                            association: reflection.name.clone(),
                            through: through.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Build the immutable Registry.
    pub fn build(mut self) -> RegistryResult<Registry> {
        self.ensure_join_types()?;
        self.validate()?;
        Ok(Registry::new(self.types, self.type_names, self.table_names))
    }
}

impl Declarations for SchemaBuilder {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn declare_type(&mut self, name: &str, options: TypeOptions) -> RegistryResult<TypeId> {
        if let Some(&id) = self.type_names.get(name) {
            let existing = &mut self.types[id.raw() as usize];
            let same_table = options
                .table_name
                .as_ref()
                .map_or(true, |table| *table == existing.table_name);
            // A join type synthesized earlier may be declared explicitly later.
            if existing.internal && !options.internal && same_table {
                existing.internal = false;
                existing.display = options.display;
                return Ok(id);
            }
            return Err(RegistryError::DuplicateTypeName(name.to_string()));
        }
        self.insert_type(name, options)
    }

    fn has_type(&self, name: &str) -> bool {
        self.type_names.contains_key(name)
    }

    fn table_name(&self, type_name: &str) -> Option<String> {
        self.type_def(type_name).map(|t| t.table_name.clone())
    }

    fn type_for_table(&self, table: &str) -> Option<String> {
        self.table_names
            .get(table)
            .map(|id| self.types[id.raw() as usize].name.clone())
    }

    fn reflection(&self, owner: &str, name: &str) -> Option<Reflection> {
        self.type_def(owner)?.get_association(name).cloned()
    }

    fn belongs_to(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.add_association(AssociationKind::BelongsTo, owner, name, options)
    }

    fn has_one(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.add_association(AssociationKind::HasOne, owner, name, options)
    }

    fn has_many(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.add_association(AssociationKind::HasMany, owner, name, options)
    }

    fn has_and_belongs_to_many(
        &mut self,
        owner: &str,
        name: &str,
        options: AssociationOptions,
    ) -> RegistryResult<()> {
        self.add_association(AssociationKind::HasAndBelongsToMany, owner, name, options)
    }

    fn before_destroy(&mut self, owner: &str, hook: Arc<dyn DestroyHook>) -> RegistryResult<()> {
        let type_def = self.type_def_mut(owner)?;
        if type_def.has_hook(hook.name()) {
            return Err(RegistryError::duplicate_hook(owner, hook.name()));
        }
        debug!(owner = %owner, hook = %hook.name(), "before_destroy hook registered");
        type_def.before_destroy.push(hook);
        Ok(())
    }
}
