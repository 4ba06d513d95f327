//! Registry error types.

use thiserror::Error;

/// Errors raised while declaring or building a schema.
///
/// These are configuration errors: they surface at declaration time and are
/// never recovered from internally.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate table name: {0}")]
    DuplicateTableName(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Association {name} is already declared on {owner}")]
    DuplicateAssociation { owner: String, name: String },

    #[error("Before-destroy hook {name} is already registered on {owner}")]
    DuplicateHook { owner: String, name: String },

    #[error("Association {owner}.{association} targets unknown type {class_name}")]
    UnknownTarget {
        owner: String,
        association: String,
        class_name: String,
    },

    #[error("Association {owner}.{association} goes through unknown association {through}")]
    UnknownThrough {
        owner: String,
        association: String,
        through: String,
    },

    #[error("Invalid options for {association}: {message}")]
    InvalidOptions { association: String, message: String },

    #[error("Unsupported declaration: {message}")]
    Unsupported { message: String },
}

impl RegistryError {
    pub fn duplicate_association(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateAssociation {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn duplicate_hook(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateHook {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn invalid_options(association: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            association: association.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}

/// Result type for schema declarations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while navigating an association of a live record.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unknown association {name} on {owner}")]
    UnknownAssociation { owner: String, name: String },

    #[error("Cannot resolve source association for {owner}.{name} through {through}")]
    UnresolvedSource {
        owner: String,
        name: String,
        through: String,
    },
}

impl ReadError {
    pub fn unknown_association(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownAssociation {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn unresolved_source(
        owner: impl Into<String>,
        name: impl Into<String>,
        through: impl Into<String>,
    ) -> Self {
        Self::UnresolvedSource {
            owner: owner.into(),
            name: name.into(),
            through: through.into(),
        }
    }
}

/// Result type for association reads.
pub type ReadResult<T> = Result<T, ReadError>;
