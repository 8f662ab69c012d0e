use std::{
    collections::BTreeMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        Mutex,
    },
};

use super::get_data_file_path;
use crate::core::MemoError;

const STORAGE_FILE: &str = "storage.json";

/// Persistent string key-value storage, the equivalent of browser local storage.
///
/// Multi-key writes and removals go through a single call so that related
/// entries (the credential pair) land together.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, MemoError>;

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), MemoError>;

    fn remove_entries(&self, keys: &[&str]) -> Result<(), MemoError>;

    fn set(&self, key: &str, value: &str) -> Result<(), MemoError> {
        self.set_entries(&[(key, value)])
    }
}

/// JSON object on disk, rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), guard: Mutex::new(()) }
    }

    pub fn open_default() -> Self {
        Self::new(get_data_file_path(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, MemoError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), MemoError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), MemoError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| MemoError::StorageUnavailable("storage lock poisoned".to_string()))?;
        let mut map = self.read_map()?;
        apply(&mut map);
        self.write_map(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, MemoError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| MemoError::StorageUnavailable("storage lock poisoned".to_string()))?;
        Ok(self.read_map()?.remove(key))
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), MemoError> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), MemoError> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

/// Process-local store. Can be switched unavailable to exercise the
/// storage-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, MemoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(MemoError::StorageUnavailable("memory store disabled".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| MemoError::StorageUnavailable("storage lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, MemoError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<(), MemoError> {
        let mut map = self.entries()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<(), MemoError> {
        let mut map = self.entries()?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip_and_removal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));

        assert_eq!(store.get("token").unwrap(), None);

        store.set_entries(&[("token", "abc"), ("username", "anna")]).unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get("username").unwrap().as_deref(), Some("anna"));

        // A fresh handle sees what the first one wrote
        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.get("username").unwrap().as_deref(), Some("anna"));

        store.remove_entries(&["token", "username"]).unwrap();
        assert_eq!(reopened.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("token"), Err(MemoError::StorageUnavailable(_))));
    }

    #[test]
    fn test_memory_store_unavailable() {
        let store = MemoryStore::new();
        store.set("token", "abc").unwrap();

        store.set_available(false);
        assert!(store.get("token").is_err());
        assert!(store.set("token", "def").is_err());

        store.set_available(true);
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
    }
}
