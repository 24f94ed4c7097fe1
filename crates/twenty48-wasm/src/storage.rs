//! `window.localStorage` as a profile store

use twenty48_core::{KeyValueStore, StorageError, StorageResult};
use web_sys::Storage;

/// Key-value store over the browser's local storage.
///
/// Private browsing modes and sandboxed frames can deny storage access;
/// the store then reads nothing and every write fails.
pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage is unavailable; scores will not be kept");
        }
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::write(key, format!("{:?}", e)))
    }

    fn backend_name(&self) -> &'static str {
        "Browser"
    }
}
