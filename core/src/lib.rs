//! Restrict Core Types
//!
//! This crate provides the foundational types used by the deletion-guard crates:
//! - Identity types (RecordId, TypeId)
//! - Value types (the Value enum stored in record attributes)
//! - Record structure with display template rendering

mod id;
mod record;
mod value;

pub use id::*;
pub use record::*;
pub use value::*;
