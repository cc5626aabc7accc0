//! Browser LocalStorage backend (WASM only)

use super::KeyValueStorage;
use crate::error::{ArcadeError, Result};

/// `window.localStorage`, looked up on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ArcadeError::StorageUnavailable("LocalStorage not available".into()))
    }
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| ArcadeError::StorageUnavailable(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| ArcadeError::StorageUnavailable(format!("{:?}", e)))
    }
}
