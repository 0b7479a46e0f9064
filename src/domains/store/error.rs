//! Store-specific error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while accessing an in-memory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}
