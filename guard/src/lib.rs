//! Restrict Guard
//!
//! Deletion guards for associations declared with a `rollback`,
//! `restrict_with_error`, `restrict` or `restrict_with_exception`
//! dependent option.
//!
//! [`RestrictDeclarations`] wraps a declaration provider. For every
//! guarded association it registers a [`DeletionGuard`] as a
//! before-destroy hook and forwards the declaration without the option,
//! so the persistence layer never applies its own handling of it.
//!
//! At destroy time a guard whose association still has dependents either
//! halts with a rollback (`rollback`, `restrict_with_error`) or raises a
//! [`DeleteRestrictionError`] (`restrict`, `restrict_with_exception`).

mod error;
mod guard;
mod message;
mod policy;
mod registrar;

pub use error::DeleteRestrictionError;
pub use guard::DeletionGuard;
pub use message::{MessageComposer, SAMPLE_LIMIT};
pub use policy::DeletionPolicy;
pub use registrar::{RestrictDeclarations, RestrictOptions};
