//! Restrict Registry
//!
//! Runtime schema lookup: entity types, association reflections and the
//! before-destroy hook chain of every type.
//!
//! Associations are declared through the [`Declarations`] trait. The
//! [`SchemaBuilder`] is the base provider; decorators wrap it to intercept
//! declarations. The [`Registry`] is immutable after `build()`.

mod builder;
mod declare;
mod error;
mod hooks;
mod registry;
mod types;

pub use builder::SchemaBuilder;
pub use declare::{join_table_name, Capabilities, Declarations, TypeBuilder, TypeOptions};
pub use error::{ReadError, ReadResult, RegistryError, RegistryResult};
pub use hooks::{AssociationReader, DestroyHook, Halt, HookContext};
pub use registry::Registry;
pub use types::*;
