use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{ConfigStore, StoreError};

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, contents: &str) -> Result<(), StoreError> {
        // Write beside the target, then swap, so a crash never leaves half a file
        let tmp = self.tmp_path();
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, contents: &str) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(contents.to_string());
        Ok(())
    }
}

/// Browser LocalStorage under a fixed key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ConfigStore for LocalStorageStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn save(&self, contents: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.key, contents)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("chain-hockey-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_missing_file_loads_none() {
        let store = FileStore::new(scratch_path("missing.json"));
        assert!(store.load().expect("not found is not an error").is_none());
    }

    #[test]
    fn test_file_store_replaces_contents() {
        let path = scratch_path("config.json");
        let store = FileStore::new(&path);
        store.save("{\"a\":1}").expect("write");
        store.save("{\"a\":2}").expect("overwrite");
        assert_eq!(store.load().expect("read").as_deref(), Some("{\"a\":2}"));
        assert!(!store.tmp_path().exists());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let other = store.clone();
        assert_eq!(store.load().expect("infallible"), None);
        other.save("x").expect("infallible");
        assert_eq!(store.load().expect("infallible").as_deref(), Some("x"));
    }
}
