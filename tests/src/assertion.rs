//! Assertion helpers shared by the integration tests.

use restrict_guard::DeleteRestrictionError;
use restrict_store::{StoreError, StoreResult};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unwrap the deletion restriction a destroy was expected to raise.
pub fn expect_restriction(result: StoreResult<bool>) -> DeleteRestrictionError {
    match result {
        Err(StoreError::Halted(error)) => match error.downcast::<DeleteRestrictionError>() {
            Ok(restriction) => *restriction,
            Err(other) => panic!("expected a DeleteRestrictionError, got {}", other),
        },
        Err(other) => panic!("expected a halted destroy, got {}", other),
        Ok(destroyed) => panic!("expected a halted destroy, got Ok({})", destroyed),
    }
}
