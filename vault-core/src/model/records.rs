//! `src/model/records.rs`
//! ============================================================
//! File and folder records held by the entity store.
//!
//! On-disk field names follow the camelCase layout of the persisted
//! `files` / `folders` arrays, so collections written by older sessions
//! (without `starred` / `trashed`) still load.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use compact_str::{CompactString, format_compact};
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::vpath::VirtualPath;

// ------------------------------------------------------------
// EntityId — opaque identifier for files and folders.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ------------------------------------------------------------
// ContentRef — handle to session-scoped blob bytes.
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(CompactString);

impl ContentRef {
    #[must_use]
    pub fn fresh() -> Self {
        Self(format_compact!("blob:{}", Uuid::new_v4()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ------------------------------------------------------------
// FileRecord / FolderRecord
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: EntityId,

    /// Display name, extension included.
    pub name: CompactString,

    pub size: u64,

    #[serde(rename = "type")]
    pub mime_type: CompactString,

    /// Directory the file lives in.
    pub path: VirtualPath,

    pub uploaded_at: DateTime<Utc>,

    #[serde(rename = "url")]
    pub content_ref: ContentRef,

    #[serde(default)]
    pub starred: bool,

    /// Soft-delete marker.
    #[serde(default)]
    pub trashed: bool,
}

impl FileRecord {
    #[must_use]
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime_type)
    }

    #[must_use]
    pub fn category(&self) -> StorageCategory {
        StorageCategory::from_mime(&self.mime_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: EntityId,

    pub name: CompactString,

    /// Parent directory.
    pub path: VirtualPath,

    pub created_at: DateTime<Utc>,
}

impl FolderRecord {
    /// The directory this folder represents, used for child lookup.
    #[must_use]
    pub fn full_path(&self) -> VirtualPath {
        self.path.join(&self.name)
    }
}

// ------------------------------------------------------------
// FileKind — icon classification.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Archive,
    Code,
    Text,
    Unknown,
}

impl FileKind {
    /// First matching rule wins; order matters (`application/pdf` before
    /// `document`, `javascript` before `text/`).
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let has = |needles: &[&str]| needles.iter().any(|n| mime.contains(n));

        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime == "application/pdf" {
            Self::Pdf
        } else if has(&["word", "document"]) {
            Self::Document
        } else if has(&["excel", "spreadsheet"]) {
            Self::Spreadsheet
        } else if has(&["powerpoint", "presentation"]) {
            Self::Presentation
        } else if has(&["zip", "rar", "tar"]) {
            Self::Archive
        } else if has(&["javascript", "python", "java"]) {
            Self::Code
        } else if mime.starts_with("text/") {
            Self::Text
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Image => "🖼️",
            Self::Video => "🎥",
            Self::Audio => "🎵",
            Self::Pdf | Self::Text | Self::Unknown => "📄",
            Self::Document => "📝",
            Self::Spreadsheet => "📊",
            Self::Presentation => "📈",
            Self::Archive => "📦",
            Self::Code => "💻",
        }
    }
}

pub const FOLDER_GLYPH: &str = "📁";

// ------------------------------------------------------------
// StorageCategory — buckets for usage statistics.
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageCategory {
    Images,
    Videos,
    Documents,
    Audio,
    Archives,
    Other,
}

impl StorageCategory {
    /// Note the rule order differs from [`FileKind`]: documents are matched
    /// before audio, and `pdf` is a substring test.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        let has = |needles: &[&str]| needles.iter().any(|n| mime.contains(n));

        if mime.starts_with("image/") {
            Self::Images
        } else if mime.starts_with("video/") {
            Self::Videos
        } else if has(&["pdf", "word", "document"]) {
            Self::Documents
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if has(&["zip", "rar", "tar"]) {
            Self::Archives
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for StorageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'_ str = match self {
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Documents => "documents",
            Self::Audio => "audio",
            Self::Archives => "archives",
            Self::Other => "other",
        };

        f.pad(s)
    }
}
