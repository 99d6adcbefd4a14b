//! Durable key-value stores backing the expiring cache
//!
//! A `DurableStore` is a synchronous, capacity-bounded string store, the same
//! shape as a browser's local storage: values are opaque strings, writes can
//! fail when the quota is exceeded, reads and removals never fail.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Default quota for a durable store: 5 MiB
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Errors that can occur when writing to a durable store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would push the store past its byte quota
    #[error("quota exceeded: writing {needed} bytes would exceed the {max} byte limit")]
    QuotaExceeded { needed: u64, max: u64 },

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Synchronous string-keyed storage with a size limit
pub trait DurableStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`; missing keys are ignored
    fn remove_item(&self, key: &str);
}

impl<S: DurableStore + ?Sized> DurableStore for Arc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) {
        (**self).remove_item(key)
    }
}

/// Stores each key as a JSON file in a cache directory
///
/// Uses `~/.cache/clubh2h/` on Linux (or the platform equivalent) unless a
/// directory is given explicitly. The quota covers the total size of all
/// files in the directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl FileStore {
    /// Creates a FileStore in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "clubh2h")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            dir,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Overrides the byte quota
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Directory the store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    /// Total bytes used by every entry except `skip`
    fn used_bytes(&self, skip: &Path) -> io::Result<u64> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut total = 0;
        for entry in entries {
            let entry = entry?;
            if entry.path() == skip {
                continue;
            }
            let meta = entry.metadata()?;
            if meta.is_file() {
                total += meta.len();
            }
        }
        Ok(total)
    }
}

impl DurableStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.item_path(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.item_path(key);
        let needed = self.used_bytes(&path)? + value.len() as u64;
        if needed > self.max_bytes {
            return Err(StoreError::QuotaExceeded {
                needed,
                max: self.max_bytes,
            });
        }

        fs::write(path, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        let _ = fs::remove_file(self.item_path(key));
    }
}

/// Keeps entries in process memory; used with `--no-persist` and in tests
#[derive(Debug)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    max_bytes: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_max_bytes(DEFAULT_MAX_BYTES)
    }

    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            max_bytes,
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store lock poisoned"))?;

        let used: u64 = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum();
        let needed = used + (key.len() + value.len()) as u64;
        if needed > self.max_bytes {
            return Err(StoreError::QuotaExceeded {
                needed,
                max: self.max_bytes,
            });
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

/// Maps a cache key to a safe file name, percent-escaping anything outside `[A-Za-z0-9_-]`
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_file_store_set_then_get() {
        let (store, _temp_dir) = create_test_store();

        store.set_item("countries_list", "[1,2,3]").expect("Write should succeed");

        assert_eq!(store.get_item("countries_list").as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get_item("nope").is_none());
    }

    #[test]
    fn test_file_store_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let store = FileStore::with_dir(nested.clone());

        store.set_item("k", "v").expect("Write should succeed");

        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn test_file_store_escapes_keys() {
        let (store, temp_dir) = create_test_store();

        store.set_item("teams_Côte d'Ivoire", "x").expect("Write should succeed");

        assert_eq!(store.get_item("teams_Côte d'Ivoire").as_deref(), Some("x"));
        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("teams_C%C3%B4te%20d%27Ivoire"));
    }

    #[test]
    fn test_file_store_remove() {
        let (store, _temp_dir) = create_test_store();
        store.set_item("k", "v").unwrap();

        store.remove_item("k");
        store.remove_item("k");

        assert!(store.get_item("k").is_none());
    }

    #[test]
    fn test_file_store_quota_exceeded() {
        let (store, _temp_dir) = create_test_store();
        let store = store.with_max_bytes(10);

        store.set_item("a", "12345").expect("Fits in quota");
        let err = store.set_item("b", "123456").unwrap_err();

        assert!(matches!(err, StoreError::QuotaExceeded { needed: 11, max: 10 }));
        assert!(store.get_item("b").is_none());
    }

    #[test]
    fn test_file_store_overwrite_does_not_count_old_value() {
        let (store, _temp_dir) = create_test_store();
        let store = store.with_max_bytes(10);

        store.set_item("a", "1234567890").unwrap();
        store.set_item("a", "0987654321").expect("Overwrite should fit");

        assert_eq!(store.get_item("a").as_deref(), Some("0987654321"));
    }

    #[test]
    fn test_memory_store_quota_exceeded() {
        let store = MemoryStore::with_max_bytes(8);

        store.set_item("k1", "abc").unwrap();
        let result = store.set_item("k2", "abc");

        assert!(matches!(result, Err(StoreError::QuotaExceeded { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_roundtrip_and_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set_item("h2h_1_2", "{}").unwrap();
        assert_eq!(store.get_item("h2h_1_2").as_deref(), Some("{}"));

        store.remove_item("h2h_1_2");
        assert!(store.is_empty());
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            let path_str = store.dir().to_string_lossy();
            assert!(path_str.contains("clubh2h"), "Cache path should contain project name");
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
