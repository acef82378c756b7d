use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for key-value store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("could not encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A durable string-keyed store with get/set semantics
pub trait KeyValueStore {
    /// Read the value at `key`, or `None` if nothing is stored there
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Store `value` at `key`, overwriting any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: each key lives in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        atomic_write(&path, value.as_bytes()).map_err(|source| StoreError::Write { path, source })
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("tabs").unwrap(), None);
        store.set("tabs", "[]").unwrap();
        assert_eq!(store.get("tabs").unwrap().as_deref(), Some("[]"));
        store.set("tabs", "[1]").unwrap();
        assert_eq!(store.get("tabs").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn dir_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirStore::new(tmp.path().join("nested").join("data"));
        assert_eq!(store.get("tabs").unwrap(), None);

        store.set("tabs", "[{\"a\":1}]").unwrap();
        assert_eq!(store.get("tabs").unwrap().as_deref(), Some("[{\"a\":1}]"));
        assert!(store.dir().join("tabs.json").exists());
    }

    #[test]
    fn dir_store_overwrites() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirStore::new(tmp.path());
        store.set("tabs", "first").unwrap();
        store.set("tabs", "second").unwrap();
        assert_eq!(store.get("tabs").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn dir_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let mut store = DirStore::new(tmp.path());
        for key in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(store.get(key), Err(StoreError::InvalidKey(_))));
            assert!(matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))));
        }
    }
}
