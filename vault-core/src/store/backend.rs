//! `src/store/backend.rs`
//! ============================================================================
//! # Key-value persistence for the entity collections
//!
//! The store writes each collection whole under a fixed key (`files`,
//! `folders`). Backends only move strings; encoding lives in the store.
//!
//! - [`MemoryBackend`]: process-local map, for tests and throwaway sessions.
//! - [`FileBackend`]: one `<key>.json` per key inside a data directory.
//!   Each write lands in a temp file first and is renamed over the target.
//!   Two processes sharing a directory still race: last write wins.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::{AppError, AppResult};

pub const FILES_KEY: &str = "files";
pub const FOLDERS_KEY: &str = "folders";

/// Minimal string store keyed by name.
pub trait KeyValueBackend {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing the store (used to simulate stale data).
    pub fn insert_raw(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens (and creates, if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("File backend rooted at {}", dir.display());
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        let target = self.key_path(key);

        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| AppError::persistence(key, e.to_string()))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| AppError::persistence(key, e.to_string()))?;
        tmp.persist(&target)
            .map_err(|e| AppError::persistence(key, e.error.to_string()))?;

        trace!("Wrote {} bytes to {}", value.len(), target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_backend_get_set() {
        let mut backend = MemoryBackend::new();
        assert_eq!(backend.get(FILES_KEY).unwrap(), None);

        backend.set(FILES_KEY, "[]").unwrap();
        assert_eq!(backend.get(FILES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_backend_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::open(temp_dir.path()).unwrap();

        assert_eq!(backend.get(FOLDERS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_backend_overwrites_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp_dir.path().join("nested")).unwrap();

        backend.set(FILES_KEY, "[1]").unwrap();
        backend.set(FILES_KEY, "[1,2]").unwrap();

        assert_eq!(backend.get(FILES_KEY).unwrap().as_deref(), Some("[1,2]"));
        assert!(temp_dir.path().join("nested").join("files.json").exists());

        // Only the target file remains; temp files were renamed away.
        let count = fs::read_dir(backend.dir()).unwrap().count();
        assert_eq!(count, 1);
    }
}
