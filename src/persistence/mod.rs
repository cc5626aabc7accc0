//! Key/value persistence
//!
//! Scores and the theme live in a string key/value store: LocalStorage in
//! the browser, a plain map elsewhere. A backend that cannot be reached
//! reports `StorageUnavailable` and callers fall back to in-memory state.

use std::collections::HashMap;

use crate::error::Result;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// String key/value store
pub trait KeyValueStorage {
    /// Read a value; `Ok(None)` when the key is absent
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.items.insert(key.to_string(), value.to_string());
        storage
    }

    /// Raw access for inspection
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

/// Storage that always fails, used to exercise degraded mode
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct UnavailableStorage;

#[cfg(test)]
impl KeyValueStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(crate::ArcadeError::StorageUnavailable("disabled".into()))
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(crate::ArcadeError::StorageUnavailable("disabled".into()))
    }
}
