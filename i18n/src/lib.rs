//! Restrict I18n
//!
//! Message catalog used to compose deletion-guard errors.
//!
//! Responsibilities:
//! - Store nested translation trees per locale (loaded from JSON)
//! - Resolve dotted keys with count-based pluralization
//! - Interpolate `%{param}` placeholders
//! - Switch the active locale and fall back to the default locale
//! - English inflections used for association and table names

mod catalog;
mod config;
mod error;
pub mod inflector;
mod plural;

pub use catalog::{Catalog, Lookup};
pub use config::I18nConfig;
pub use error::{CatalogError, CatalogResult};
pub use plural::{PluralCategory, PluralRule};
