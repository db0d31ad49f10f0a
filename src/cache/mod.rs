use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub mod store;

use store::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    WorkDirectory,
    FolderStates,
}

impl CacheKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WorkDirectory => "workDirectory",
            Self::FolderStates => "folderStates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFile {
    pub path: String,
    #[serde(rename = "lastModified")]
    pub last_modified: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDirectoryInfo {
    pub name: String,
    pub files: Vec<CachedFile>,
}

pub type FolderStateMap = BTreeMap<String, bool>;

pub struct Cache {
    store: Box<dyn KeyValueStore>,
}

impl Cache {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn load_work_directory(&self) -> Option<WorkDirectoryInfo> {
        self.load(CacheKey::WorkDirectory)
    }

    pub fn save_work_directory(&mut self, info: &WorkDirectoryInfo) -> Result<(), StoreError> {
        self.save(CacheKey::WorkDirectory, info)
    }

    pub fn clear_work_directory(&mut self) -> Result<(), StoreError> {
        self.store.remove(CacheKey::WorkDirectory.as_str())
    }

    pub fn load_folder_states(&self) -> FolderStateMap {
        self.load(CacheKey::FolderStates).unwrap_or_default()
    }

    pub fn save_folder_states(&mut self, states: &FolderStateMap) -> Result<(), StoreError> {
        self.save(CacheKey::FolderStates, states)
    }

    pub fn clear_folder_states(&mut self) -> Result<(), StoreError> {
        self.store.remove(CacheKey::FolderStates.as_str())
    }

    // Absent, unreadable and corrupt entries all read as empty.
    fn load<T: for<'de> Deserialize<'de>>(&self, key: CacheKey) -> Option<T> {
        let raw = match self.store.get(key.as_str()) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "discarding corrupt cache entry");
                None
            }
        }
    }

    fn save<T: Serialize>(&mut self, key: CacheKey, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.as_str().to_string(),
            source,
        })?;
        self.store.set(key.as_str(), &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::store::{FileStore, MemoryStore};
    use super::*;

    #[test]
    fn corrupt_folder_states_load_as_empty() {
        let mut store = MemoryStore::default();
        store
            .set(CacheKey::FolderStates.as_str(), "{ definitely not json")
            .expect("memory write");
        let cache = Cache::new(store);

        assert!(cache.load_folder_states().is_empty());
    }

    #[test]
    fn folder_states_round_trip_through_file_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cache = Cache::new(FileStore::open(dir.path()).expect("store should open"));
        let mut states = FolderStateMap::new();
        states.insert("demo/src".to_string(), false);
        states.insert("demo".to_string(), true);

        cache.save_folder_states(&states).expect("save");
        let reopened = Cache::new(FileStore::open(dir.path()).expect("store should reopen"));

        assert_eq!(reopened.load_folder_states(), states);
    }

    #[test]
    fn work_directory_uses_camel_case_field_names() {
        let mut cache = Cache::new(MemoryStore::default());
        let info = WorkDirectoryInfo {
            name: "demo".to_string(),
            files: vec![CachedFile {
                path: "demo/main.py".to_string(),
                last_modified: 1_700_000_000_000,
            }],
        };
        cache.save_work_directory(&info).expect("save");

        let raw = cache
            .store
            .get(CacheKey::WorkDirectory.as_str())
            .expect("get")
            .expect("entry present");
        assert!(raw.contains("\"lastModified\":1700000000000"));
        assert_eq!(cache.load_work_directory(), Some(info));

        cache.clear_work_directory().expect("clear");
        assert!(cache.load_work_directory().is_none());
    }
}
