//! `src/store/mutations.rs`
//! ============================================================================
//! # Mutation API: the only sanctioned ways to change entities
//!
//! Every operation mutates memory first, then writes both collections through
//! the backend. Unknown ids are silent no-ops reported as `Ok(false)` and do
//! not trigger a write. The only error source is persistence.
//!
//! Folder deletion is a hard delete and does not cascade: files and folders
//! that lived under the removed folder stay where they are.

use bytes::Bytes;
use chrono::Utc;
use compact_str::CompactString;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::model::{
    records::{EntityId, FileRecord, FolderRecord},
    vpath::VirtualPath,
};
use crate::store::{backend::KeyValueBackend, entity_store::EntityStore};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Bytes handed over by the front end for an upload.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub name: CompactString,
    pub mime_type: CompactString,
    pub content: Bytes,
}

impl UploadSource {
    pub fn new(
        name: impl Into<CompactString>,
        mime_type: impl Into<CompactString>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Guess the MIME type from the file name's extension.
    pub fn from_bytes(name: impl Into<CompactString>, content: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(name.as_str())
            .first_raw()
            .unwrap_or(FALLBACK_MIME);

        Self {
            mime_type: CompactString::from(mime),
            name,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Front-end check for folder and rename input. The store itself accepts
/// any name.
pub fn validate_entry_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(AppError::invalid_input("name", "must not be empty"));
    }

    if trimmed.contains('/') {
        return Err(AppError::invalid_input("name", "must not contain '/'"));
    }

    Ok(trimmed)
}

impl<B: KeyValueBackend> EntityStore<B> {
    /// Store `source` as a new file under `path`.
    pub fn upload_file(&mut self, source: UploadSource, path: VirtualPath) -> AppResult<FileRecord> {
        let size = source.size();
        let content_ref = self.blobs.put(source.content);

        let record = FileRecord {
            id: EntityId::new(),
            name: source.name,
            size,
            mime_type: source.mime_type,
            path,
            uploaded_at: Utc::now(),
            content_ref,
            starred: false,
            trashed: false,
        };

        info!("Uploaded {} ({} bytes) to {}", record.name, size, record.path);
        self.files.push(record.clone());
        self.save()?;

        Ok(record)
    }

    pub fn create_folder(
        &mut self,
        name: impl Into<CompactString>,
        path: VirtualPath,
    ) -> AppResult<FolderRecord> {
        let record = FolderRecord {
            id: EntityId::new(),
            name: name.into(),
            path,
            created_at: Utc::now(),
        };

        info!("Created folder {}", record.full_path());
        self.folders.push(record.clone());
        self.save()?;

        Ok(record)
    }

    /// Soft delete: mark trashed and drop from the selection.
    pub fn delete_file(&mut self, id: EntityId) -> AppResult<bool> {
        let Some(file) = self.file_mut(id) else {
            debug!("delete_file: no file {id}");
            return Ok(false);
        };
        file.trashed = true;

        self.ui.selected.remove(&id);
        info!("Moved file {id} to trash");
        self.save()?;
        Ok(true)
    }

    pub fn restore_file(&mut self, id: EntityId) -> AppResult<bool> {
        let Some(file) = self.file_mut(id) else {
            debug!("restore_file: no file {id}");
            return Ok(false);
        };
        file.trashed = false;

        info!("Restored file {id}");
        self.save()?;
        Ok(true)
    }

    /// Hard delete. Children are left in place under the orphaned path.
    pub fn delete_folder(&mut self, id: EntityId) -> AppResult<bool> {
        let Some(idx) = self.folders.iter().position(|f| f.id == id) else {
            debug!("delete_folder: no folder {id}");
            return Ok(false);
        };
        let removed = self.folders.remove(idx);

        self.ui.selected.remove(&id);
        info!("Deleted folder {}", removed.full_path());
        self.save()?;
        Ok(true)
    }

    /// No collision check against siblings.
    pub fn rename_file(&mut self, id: EntityId, new_name: impl Into<CompactString>) -> AppResult<bool> {
        let Some(file) = self.file_mut(id) else {
            debug!("rename_file: no file {id}");
            return Ok(false);
        };
        file.name = new_name.into();

        info!("Renamed file {id} to {}", file.name);
        self.save()?;
        Ok(true)
    }

    /// Only the folder record changes; children keep their stored `path`.
    pub fn rename_folder(&mut self, id: EntityId, new_name: impl Into<CompactString>) -> AppResult<bool> {
        let Some(folder) = self.folder_mut(id) else {
            debug!("rename_folder: no folder {id}");
            return Ok(false);
        };
        folder.name = new_name.into();

        info!("Renamed folder {id} to {}", folder.name);
        self.save()?;
        Ok(true)
    }

    pub fn toggle_starred(&mut self, id: EntityId) -> AppResult<bool> {
        let Some(file) = self.file_mut(id) else {
            debug!("toggle_starred: no file {id}");
            return Ok(false);
        };
        file.starred = !file.starred;

        debug!("File {id} starred={}", file.starred);
        self.save()?;
        Ok(true)
    }

    /// Bytes of an uploaded file, if still held by this session.
    #[must_use]
    pub fn read_content(&self, id: EntityId) -> Option<Bytes> {
        self.file(id).and_then(|f| self.blobs.get(&f.content_ref))
    }
}
