//! Profile storage port trait
//!
//! Key/value persistence for the client-side profile cache. Calls are
//! synchronous: a write has landed by the time it returns.

use crate::error::StorageError;

/// Port trait for profile persistence
pub trait ProfileStorage: Send + Sync {
    /// Read the raw value stored under `key`, `None` if nothing is stored
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
