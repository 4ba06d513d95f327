//! Integration test fixtures for the deletion-guard crates.
//!
//! A [`Fixture`] declares the order/category/product schema through a
//! [`RestrictDeclarations`](restrict_guard::RestrictDeclarations) decorator
//! and hands back a [`World`]: a fresh store plus the shared catalog.

mod assertion;
mod fixture;

pub use assertion::{expect_restriction, init_tracing};
pub use fixture::{active, catalog, Fixture, World};

pub mod prelude {
    pub use crate::{expect_restriction, init_tracing, Fixture, World};
    pub use restrict_core::{attrs, Record, RecordId, Value};
    pub use restrict_guard::{DeleteRestrictionError, RestrictOptions};
    pub use restrict_registry::{Capabilities, Dependent, RegistryError};
    pub use restrict_store::{Store, StoreError};
}
