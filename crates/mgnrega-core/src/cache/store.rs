//! Persistent key-value storage behind the snapshot cache.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store is unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string store with `getItem`/`setItem` semantics and no expiry.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, `None` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

/// One JSON file per key inside a cache directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.item_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.item_path(key);
        // Readers only ever observe complete snapshots
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|source| StoreError::Io {
                key: key.to_string(),
                source,
            })
    }
}

/// Turn a key into a file name. Injective: distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items
            .read()
            .map(|items| items.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_keeps_safe_characters() {
        assert_eq!(encode_key("mgnrega_year_2023-2024"), "mgnrega_year_2023-2024");
        assert_eq!(encode_key("mgnrega_district_east champaran_2023-2024"),
            "mgnrega_district_east%20champaran_2023-2024");
        assert_eq!(encode_key("a/b"), "a%2Fb");
    }

    #[test]
    fn test_encode_key_is_injective() {
        assert_ne!(encode_key("a b"), encode_key("a_b"));
        assert_ne!(encode_key("a%20b"), encode_key("a b"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("snapshots")).expect("store");

        assert!(store.get_item("missing").unwrap().is_none());

        store.set_item("mgnrega_year_2024-2025", "{\"records\":[]}").unwrap();
        assert_eq!(
            store.get_item("mgnrega_year_2024-2025").unwrap().as_deref(),
            Some("{\"records\":[]}")
        );

        store.set_item("mgnrega_year_2024-2025", "{}").unwrap();
        assert_eq!(store.get_item("mgnrega_year_2024-2025").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = FileStore::new(dir.path().to_path_buf()).expect("store");
            store.set_item("mgnrega_district_gaya_2022-2023", "saved").unwrap();
        }
        let reopened = FileStore::new(dir.path().to_path_buf()).expect("store");
        assert_eq!(
            reopened.get_item("mgnrega_district_gaya_2022-2023").unwrap().as_deref(),
            Some("saved")
        );
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        handle.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        assert!(store.contains_key("k"));
        assert_eq!(store.len(), 1);
    }
}
