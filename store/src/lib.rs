//! Restrict Store
//!
//! In-memory persistence for the types of a [`Registry`](restrict_registry::Registry).
//!
//! Responsibilities:
//! - One table per entity type with never-reused primary keys
//! - Association navigation (direct, join table, `through`) and scopes
//! - Nested transactions backed by an undo log
//! - DESTROY: before-destroy hooks, native dependent options, removal

mod destroy;
mod error;
mod navigate;
mod store;
mod table;
mod transaction;

pub use error::{StoreError, StoreResult};
pub use store::Store;
pub use table::Table;
pub use transaction::{TransactionState, Undo, UndoLog};
