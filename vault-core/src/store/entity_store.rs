//! `src/store/entity_store.rs`
//! ============================================================================
//! # `EntityStore`: authoritative file and folder collections
//!
//! Owns both collections, the session UI state, the upload blobs and the
//! persistence backend. Callers hold the store by value (or `&mut`) and pass it
//! where it is needed; there is no global instance.
//!
//! Mutations live in `store::mutations`, read-side views in `store::navigator`.
//! Both write through [`EntityStore::save`] after every successful change.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::model::{
    records::{EntityId, FileRecord, FolderRecord},
    ui_state::{UiState, ViewMode},
};
use crate::store::{
    backend::{FILES_KEY, FOLDERS_KEY, KeyValueBackend},
    blobs::BlobStore,
};

pub struct EntityStore<B: KeyValueBackend> {
    pub(crate) files: Vec<FileRecord>,

    pub(crate) folders: Vec<FolderRecord>,

    pub(crate) ui: UiState,

    pub(crate) blobs: BlobStore,

    backend: B,
}

impl<B: KeyValueBackend> EntityStore<B> {
    /// Open a store over `backend`, loading whatever it holds.
    pub fn open(backend: B) -> Self {
        let mut store = Self {
            files: Vec::new(),
            folders: Vec::new(),
            ui: UiState::default(),
            blobs: BlobStore::new(),
            backend,
        };
        store.load();
        store
    }

    #[must_use]
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.ui.view_mode = view_mode;
        self
    }

    /// Replace in-memory collections with the persisted ones.
    ///
    /// Never fails: a missing key, an unreadable key or malformed JSON each
    /// yield an empty collection for that key.
    pub fn load(&mut self) {
        self.files = dedupe_by_id(
            load_collection(&self.backend, FILES_KEY),
            |f: &FileRecord| f.id,
        );
        self.folders = dedupe_by_id(
            load_collection(&self.backend, FOLDERS_KEY),
            |f: &FolderRecord| f.id,
        );

        info!(
            "Loaded {} files and {} folders",
            self.files.len(),
            self.folders.len()
        );
    }

    /// Write both collections in full.
    ///
    /// A failed write leaves the in-memory change in place; the next
    /// successful save persists it.
    pub fn save(&mut self) -> AppResult<()> {
        let files = serde_json::to_string(&self.files)?;
        let folders = serde_json::to_string(&self.folders)?;

        self.backend.set(FILES_KEY, &files)?;
        self.backend.set(FOLDERS_KEY, &folders)?;

        debug!(
            files = self.files.len(),
            folders = self.folders.len(),
            "Persisted collections"
        );
        Ok(())
    }

    #[must_use]
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    #[must_use]
    pub fn folders(&self) -> &[FolderRecord] {
        &self.folders
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn file(&self, id: EntityId) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn folder(&self, id: EntityId) -> Option<&FolderRecord> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub(crate) fn file_mut(&mut self, id: EntityId) -> Option<&mut FileRecord> {
        self.files.iter_mut().find(|f| f.id == id)
    }

    pub(crate) fn folder_mut(&mut self, id: EntityId) -> Option<&mut FolderRecord> {
        self.folders.iter_mut().find(|f| f.id == id)
    }
}

fn load_collection<B, T>(backend: &B, key: &str) -> Vec<T>
where
    B: KeyValueBackend,
    T: DeserializeOwned,
{
    match backend.get(key) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Discarding malformed '{key}' collection: {e}");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read '{key}' collection, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Keep the first record for each id.
fn dedupe_by_id<T>(records: Vec<T>, id_of: impl Fn(&T) -> EntityId) -> Vec<T> {
    let before = records.len();
    let mut seen: HashSet<EntityId> = HashSet::with_capacity(before);
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| seen.insert(id_of(r)))
        .collect();

    if kept.len() != before {
        warn!("Dropped {} records with duplicate ids", before - kept.len());
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::model::vpath::VirtualPath;
    use crate::store::backend::{FileBackend, MemoryBackend};
    use crate::store::mutations::UploadSource;
    use chrono::Utc;
    use tempfile::TempDir;

    /// Backend whose reads and writes can be switched to fail.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_get: bool,
        fail_set: bool,
    }

    impl KeyValueBackend for FlakyBackend {
        fn get(&self, key: &str) -> AppResult<Option<String>> {
            if self.fail_get {
                return Err(AppError::Io(std::io::Error::other("read refused")));
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
            if self.fail_set {
                return Err(AppError::persistence(key, "quota exceeded"));
            }
            self.inner.set(key, value)
        }
    }

    fn folder(name: &str) -> FolderRecord {
        FolderRecord {
            id: EntityId::new(),
            name: name.into(),
            path: VirtualPath::root(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_empty_backend() {
        let store = EntityStore::open(MemoryBackend::new());
        assert!(store.files().is_empty());
        assert!(store.folders().is_empty());
        assert_eq!(store.ui().current_path, VirtualPath::root());
    }

    #[test]
    fn test_malformed_key_is_discarded_independently() {
        let mut backend = MemoryBackend::new();
        backend.insert_raw(FILES_KEY, "{not json");
        let folders = vec![folder("Work")];
        backend.insert_raw(FOLDERS_KEY, serde_json::to_string(&folders).unwrap());

        let store = EntityStore::open(backend);
        assert!(store.files().is_empty());
        assert_eq!(store.folders(), folders.as_slice());
    }

    #[test]
    fn test_duplicate_ids_are_dropped_on_load() {
        let original = folder("Work");
        let mut clash = folder("Play");
        clash.id = original.id;

        let mut backend = MemoryBackend::new();
        backend.insert_raw(
            FOLDERS_KEY,
            serde_json::to_string(&vec![original.clone(), clash]).unwrap(),
        );

        let store = EntityStore::open(backend);
        assert_eq!(store.folders(), std::slice::from_ref(&original));
    }

    #[test]
    fn test_save_then_reopen_from_disk() {
        let temp_dir = TempDir::new().unwrap();

        let mut store = EntityStore::open(FileBackend::open(temp_dir.path()).unwrap());
        store.folders.push(folder("Photos"));
        store.save().unwrap();

        let reopened = EntityStore::open(FileBackend::open(temp_dir.path()).unwrap());
        assert_eq!(reopened.folders().len(), 1);
        assert_eq!(reopened.folders()[0].name, "Photos");
        // UI state is session-only
        assert!(reopened.ui().search_query.is_empty());
    }

    #[test]
    fn test_read_errors_open_empty() {
        let mut backend = FlakyBackend {
            fail_get: true,
            ..FlakyBackend::default()
        };
        backend.inner.insert_raw(
            FOLDERS_KEY,
            serde_json::to_string(&vec![folder("Work")]).unwrap(),
        );

        let store = EntityStore::open(backend);
        assert!(store.files().is_empty());
        assert!(store.folders().is_empty());
    }

    #[test]
    fn test_write_errors_reach_the_caller() {
        let mut store = EntityStore::open(FlakyBackend::default());
        let kept = store
            .upload_file(UploadSource::new("a.txt", "text/plain", "a"), VirtualPath::root())
            .unwrap();

        store.backend.fail_set = true;

        let err = store
            .upload_file(UploadSource::new("b.txt", "text/plain", "b"), VirtualPath::root())
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence { ref key, .. } if key == FILES_KEY));

        let err = store.delete_file(kept.id).unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));

        // the change stays applied in memory, but never reached the backend
        assert_eq!(store.files().len(), 2);
        assert!(store.file(kept.id).unwrap().trashed);
        let persisted: Vec<FileRecord> =
            serde_json::from_str(store.backend().inner.raw(FILES_KEY).unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
        assert!(!persisted[0].trashed);

        // the next successful write catches up
        store.backend.fail_set = false;
        store.save().unwrap();
        let persisted: Vec<FileRecord> =
            serde_json::from_str(store.backend().inner.raw(FILES_KEY).unwrap()).unwrap();
        assert_eq!(persisted.len(), 2);
    }
}
