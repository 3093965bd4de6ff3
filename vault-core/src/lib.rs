pub mod error;

pub mod config;

pub mod logging;
pub use logging::Logger;

pub mod model {
    pub mod records;
    pub use records::{
        ContentRef, EntityId, FOLDER_GLYPH, FileKind, FileRecord, FolderRecord, StorageCategory,
    };

    pub mod ui_state;
    pub use ui_state::{UiState, ViewMode};

    pub mod vpath;
    pub use vpath::VirtualPath;
}

pub mod store {
    pub mod backend;
    pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};

    pub mod blobs;

    pub mod entity_store;
    pub use entity_store::EntityStore;

    pub mod mutations;
    pub use mutations::{UploadSource, validate_entry_name};

    pub mod navigator;
    pub use navigator::{Breadcrumb, ListedItem};

    pub mod stats;
    pub use stats::{CategoryUsage, StorageStats};
}

pub mod util {
    pub mod humanize;
}

pub use error::{AppError, AppResult};

pub use model::{FileRecord, FolderRecord, VirtualPath};
pub use store::EntityStore;
