//! In-memory profile storage
//!
//! Backs the store in unit tests. Writes can be made to fail on demand.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::domain::ports::ProfileStorage;
use crate::error::StorageError;

#[derive(Default)]
pub struct InMemoryProfileStorage {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemoryProfileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with_value(self, key: &str, value: impl Into<String>) -> Self {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        self
    }

    /// Make every subsequent write and remove fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored value, bypassing the port
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }
        Ok(())
    }
}

impl ProfileStorage for InMemoryProfileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
