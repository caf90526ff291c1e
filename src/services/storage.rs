use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "store.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string key-value store backing the baseline and daily samples.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// A persisted value after decoding. Unparseable content decodes to `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stored<T> {
    Absent,
    Present(T),
}

impl<T: DeserializeOwned> Stored<T> {
    pub fn decode(key: &str, raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Stored::Absent;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Stored::Present(value),
            Err(e) => {
                tracing::warn!("Ignoring corrupt value under {}: {}", key, e);
                Stored::Absent
            }
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Self {
        Self::decode(key, store.get(key))
    }
}

impl<T> Stored<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Stored::Absent => None,
            Stored::Present(value) => Some(value),
        }
    }
}

pub fn save<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    store.set(key, serde_json::to_string(value)?)
}

/// File-backed store: every entry lives in one JSON object under `data_dir`.
pub struct LocalStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStorage {
    pub fn new(base_dir: &str) -> Result<Self, StorageError> {
        let data_dir = PathBuf::from(base_dir);
        fs::create_dir_all(&data_dir)?;
        let path = data_dir.join(STORE_FILE);
        let entries = Self::read_entries(&path);

        tracing::debug!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        let Ok(file) = File::open(path) else {
            return BTreeMap::new();
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Store file {} unreadable, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }

    /// Write to a sibling temp file, then rename over the store.
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(writer, entries)?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    // memory only changes once the file write has succeeded
    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Process-local store for tests and runs with persistence disabled.
#[derive(Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
