//! JSON key-value store for ~/.harmony/ records.
//!
//! Each key maps to `<key>.json` under the store root. Missing records read
//! as `None`; unreadable or corrupt ones surface as `StoreError` so callers
//! can decide whether to fall back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt record '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode record '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Get the ~/.harmony/ directory path, creating it if needed.
pub fn harmony_dir() -> Result<PathBuf, StoreError> {
    let home_dir = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
    let dir = home_dir.join(".harmony");
    create_dir(&dir)?;
    Ok(dir)
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Store rooted at ~/.harmony/.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self {
            root: harmony_dir()?,
        })
    }

    /// Store rooted at an explicit directory, created if needed.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        create_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Read a record. A missing file is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    /// Read a record, falling back to `T::default()` if missing or unreadable.
    pub fn get_or_default<T: Default + DeserializeOwned>(&self, key: &str) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key, error = %e, "falling back to default record");
                T::default()
            }
        }
    }

    /// Write a record as pretty-printed JSON.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, json).map_err(|source| StoreError::Io { path, source })
    }

    /// Delete a record. Deleting a missing record is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// A store in a fresh temporary directory, for tests.
#[cfg(test)]
pub(crate) fn temp_store() -> JsonStore {
    use std::sync::atomic::{AtomicU64, Ordering};
    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "harmony-test-{}-{}",
        std::process::id(),
        test_id
    ));
    let _ = fs::remove_dir_all(&dir);
    JsonStore::at(dir).expect("temp store")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_format() {
        let store = temp_store();
        let path = store.path_for("leaderboard");
        assert!(path.starts_with(store.root()));
        assert!(path.to_string_lossy().ends_with("leaderboard.json"));
    }

    #[test]
    fn test_missing_record_is_none() {
        let store = temp_store();
        let value: Option<Vec<String>> = store.get("nothing_here").unwrap();
        assert!(value.is_none());
        let fallback: Vec<String> = store.get_or_default("nothing_here");
        assert!(fallback.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let store = temp_store();
        store.put("best", &42u32).unwrap();
        assert_eq!(store.get::<u32>("best").unwrap(), Some(42));
    }

    #[test]
    fn test_corrupt_record_is_error_and_defaults() {
        let store = temp_store();
        fs::write(store.path_for("broken"), "{ not json").unwrap();
        let err = store.get::<Vec<u32>>("broken").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(err.to_string().contains("broken"));
        let fallback: Vec<u32> = store.get_or_default("broken");
        assert!(fallback.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = temp_store();
        store.put("session", &"x").unwrap();
        store.remove("session").unwrap();
        store.remove("session").unwrap();
        assert!(store.get::<String>("session").unwrap().is_none());
    }
}
