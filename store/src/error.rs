//! Store error types.

use std::error::Error as StdError;

use restrict_core::RecordId;
use restrict_registry::ReadError;
use thiserror::Error;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Type not found in the registry.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Record not found in its table.
    #[error("{type_name} {id} not found")]
    RecordNotFound { type_name: String, id: RecordId },

    /// Association navigation failed.
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// Association cannot be written through `link`.
    #[error("cannot link through {owner}.{association}: {message}")]
    Unlinkable {
        owner: String,
        association: String,
        message: String,
    },

    /// Association has no scope with this name.
    #[error("{association} has no scope named {scope}")]
    UnknownScope { association: String, scope: String },

    /// No transaction is active.
    #[error("no transaction is active")]
    NoActiveTransaction,

    /// A native `restrict` dependent option refused the destroy.
    #[error("cannot delete record because of dependent {association}")]
    Restricted { owner: String, association: String },

    /// A before-destroy hook raised an error; the destroy was rolled back.
    #[error("{0}")]
    Halted(Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    pub fn record_not_found(type_name: impl Into<String>, id: RecordId) -> Self {
        Self::RecordNotFound {
            type_name: type_name.into(),
            id,
        }
    }

    pub fn unlinkable(
        owner: impl Into<String>,
        association: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Unlinkable {
            owner: owner.into(),
            association: association.into(),
            message: message.into(),
        }
    }

    pub fn unknown_scope(association: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::UnknownScope {
            association: association.into(),
            scope: scope.into(),
        }
    }

    pub fn restricted(owner: impl Into<String>, association: impl Into<String>) -> Self {
        Self::Restricted {
            owner: owner.into(),
            association: association.into(),
        }
    }

    /// The error a before-destroy hook raised, if it is an `E`.
    pub fn halted<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Halted(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
