//! Storage backends for the terminal front end
//!
//! Supports different backends based on environment:
//! - Local: a JSON file under the platform data directory
//! - Test: in-memory, nothing is written to disk

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use twenty48_core::{KeyValueStore, MemoryStore, StorageError, StorageResult};

/// File name of the profile store inside the data directory
pub const STORE_FILE: &str = "twenty48.json";

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Normal play - file-based storage
    Local,
    /// Testing - in-memory store
    Test,
}

impl Environment {
    /// Detect environment from the TWENTY48_ENV variable
    pub fn detect() -> Self {
        Self::from_value(std::env::var("TWENTY48_ENV").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("test") | Some("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

/// Directory used for the store and the log file
pub fn data_dir(override_dir: Option<PathBuf>) -> PathBuf {
    override_dir
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

// ==================== Local File Backend ====================

/// Key-value store persisted as a single JSON file
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<Option<StoreData>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STORE_FILE),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreData {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref data) = *cache {
            return data.clone();
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("ignoring unreadable store {}: {}", self.path.display(), err);
                StoreData::default()
            }),
            Err(_) => StoreData::default(),
        };

        *cache = Some(data.clone());
        data
    }

    fn save(&self, key: &str, data: &StoreData) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(data).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::write(key, e))?;
        }
        std::fs::write(&self.path, json).map_err(|e| StorageError::write(key, e))?;

        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = Some(data.clone());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.load();
        data.values.insert(key.to_string(), value.to_string());
        self.save(key, &data)
    }

    fn backend_name(&self) -> &'static str {
        "Local"
    }
}

/// Create the store for an environment
pub fn create_store(env: Environment, dir: &Path) -> Box<dyn KeyValueStore> {
    match env {
        Environment::Local => {
            let store = FileStore::new(dir);
            log::info!("using profile store at {}", store.path().display());
            Box::new(store)
        }
        Environment::Test => {
            log::info!("using in-memory profile store");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use twenty48_core::storage::BEST_SCORE_KEY;

    #[test]
    fn test_environment_detection() {
        assert_eq!(Environment::from_value(None), Environment::Local);
        assert_eq!(Environment::from_value(Some("test")), Environment::Test);
        assert_eq!(Environment::from_value(Some("testing")), Environment::Test);
        assert_eq!(Environment::from_value(Some("prod")), Environment::Local);
    }

    #[test]
    fn test_file_store_persists() {
        let td = tempdir().unwrap();
        let dir = td.path().join("profile");
        let store = FileStore::new(&dir);
        assert_eq!(store.get(BEST_SCORE_KEY), None);
        store.set(BEST_SCORE_KEY, "512").unwrap();
        assert_eq!(store.get(BEST_SCORE_KEY).as_deref(), Some("512"));

        // A fresh store reads what the first one wrote
        let reopened = FileStore::new(&dir);
        assert_eq!(reopened.get(BEST_SCORE_KEY).as_deref(), Some("512"));
        assert_eq!(reopened.backend_name(), "Local");
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let td = tempdir().unwrap();
        let dir = td.path();
        std::fs::write(dir.join(STORE_FILE), "{not json").unwrap();

        let store = FileStore::new(dir);
        assert_eq!(store.get(BEST_SCORE_KEY), None);
        store.set(BEST_SCORE_KEY, "8").unwrap();
        assert_eq!(FileStore::new(dir).get(BEST_SCORE_KEY).as_deref(), Some("8"));
    }

    #[test]
    fn test_test_environment_uses_memory() {
        let store = create_store(Environment::Test, Path::new("/nonexistent"));
        assert_eq!(store.backend_name(), "Memory");
    }
}
