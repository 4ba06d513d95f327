//! Deletion policies enforced by guards.

use restrict_registry::Dependent;
use std::fmt;

/// What happens when a guarded association still has dependents at
/// destroy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionPolicy {
    /// No guard; the declaration is forwarded untouched.
    PassThrough,
    /// Abort the destroy silently.
    Rollback,
    /// Abort the destroy silently.
    RestrictWithError,
    /// Abort the destroy with a [`DeleteRestrictionError`](crate::DeleteRestrictionError).
    Restrict,
    /// Abort the destroy with a [`DeleteRestrictionError`](crate::DeleteRestrictionError).
    RestrictWithException,
}

impl DeletionPolicy {
    /// Policy for the `dependent` option of a declaration.
    pub fn resolve(dependent: Option<Dependent>) -> Self {
        match dependent {
            Some(Dependent::Rollback) => DeletionPolicy::Rollback,
            Some(Dependent::RestrictWithError) => DeletionPolicy::RestrictWithError,
            Some(Dependent::Restrict) => DeletionPolicy::Restrict,
            Some(Dependent::RestrictWithException) => DeletionPolicy::RestrictWithException,
            Some(Dependent::Destroy | Dependent::DeleteAll | Dependent::Nullify) | None => {
                DeletionPolicy::PassThrough
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionPolicy::PassThrough => "pass_through",
            DeletionPolicy::Rollback => "rollback",
            DeletionPolicy::RestrictWithError => "restrict_with_error",
            DeletionPolicy::Restrict => "restrict",
            DeletionPolicy::RestrictWithException => "restrict_with_exception",
        }
    }

    /// Whether a guard is installed for this policy.
    pub fn is_guarded(&self) -> bool {
        *self != DeletionPolicy::PassThrough
    }

    /// Whether dependents abort the destroy without an error.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            DeletionPolicy::Rollback | DeletionPolicy::RestrictWithError
        )
    }

    /// Name of the before-destroy hook guarding `association`.
    pub fn hook_name(&self, association: &str) -> String {
        format!("dependent_{}_for_{}", self.as_str(), association)
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
