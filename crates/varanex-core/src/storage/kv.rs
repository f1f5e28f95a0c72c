use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::constants::paths;
use crate::error::{Result, VaranexError};

/// Synchronous string key-value storage that survives restarts.
///
/// Absence of a key is not an error: `get` returns `Ok(None)`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key in its own file (`<dir>/<key>.json`).
pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store in the default data directory (e.g. ~/.local/share/varanex/)
    pub fn new() -> Result<Self> {
        Self::with_dir(Self::default_dir()?)
    }

    /// Create a store rooted at a custom directory (useful for testing)
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| {
            VaranexError::Storage(format!(
                "Failed to create data directory {}: {}",
                base_dir.display(),
                e
            ))
        })?;

        Ok(Self { base_dir })
    }

    pub fn default_dir() -> Result<PathBuf> {
        let data = dirs::data_dir().ok_or_else(|| {
            VaranexError::Config("Could not determine data directory".to_string())
        })?;
        Ok(data.join(paths::DATA_DIR))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(VaranexError::storage(key, "invalid key"));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaranexError::storage(key, format!("read failed: {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, value)
            .map_err(|e| VaranexError::storage(key, format!("write failed: {e}")))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| VaranexError::storage(key, format!("rename failed: {e}")))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaranexError::storage(key, format!("remove failed: {e}"))),
        }
    }
}

/// In-process store. Nothing outlives the process.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_dir(dir.path()).unwrap();
        assert_eq!(store.get("chats").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_dir(dir.path()).unwrap();

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(dir.path().join("theme.json").exists());
        assert!(!dir.path().join("theme.json.tmp").exists());

        store.set("theme", "green").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("green"));

        store.remove("theme").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
        // Removing twice is fine.
        store.remove("theme").unwrap();
    }

    #[test]
    fn test_file_store_creates_nested_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileKeyValueStore::with_dir(&nested).unwrap();
        store.set("chats", "[]").unwrap();
        assert!(nested.join("chats.json").exists());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_dir(dir.path()).unwrap();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
