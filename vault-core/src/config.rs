//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver (directories only)
//!
//! User-editable settings for the vault, stored as TOML at the platform
//! config path from the [`directories`](https://docs.rs/directories) crate.
//!
//! ## Features
//! - XDG-compliant config discovery and writing (Linux, macOS, Windows)
//! - Defaults written out on first run
//! - Async load/save on Tokio
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load(None).await?;
//! let store = EntityStore::open(FileBackend::open(config.data_dir()?)?);
//! ```

use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize, Serializer};
use tokio::fs as TokioFs;
use crate::error::{AppError, AppResult};
use crate::logging::LoggerConfig;
use crate::model::ui_state::ViewMode;
use crate::store::stats::DEFAULT_STORAGE_LIMIT;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "vault";
const APPLICATION: &str = "Vault";

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where `files.json` / `folders.json` live. Falls back to the platform
    /// data dir.
    pub data_dir: Option<PathBuf>,

    /// Quota used for the usage summary. Written as a plain byte count;
    /// "10 GiB" style strings are accepted on read.
    #[serde(serialize_with = "serialize_byte_count")]
    pub storage_limit: ByteSize,

    pub default_view: ViewMode,

    pub logging: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_limit: DEFAULT_STORAGE_LIMIT,
            default_view: ViewMode::Grid,
            logging: LoggerConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from `path`, or the platform config file when `None`.
    /// A missing file is created with defaults.
    pub async fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if TokioFs::try_exists(&path).await.unwrap_or(false) {
            let text = TokioFs::read_to_string(&path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.clone(),
                    source,
                })?;

            Self::from_toml(&text)
        } else {
            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    pub fn from_toml(text: &str) -> AppResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Saves config to the platform config file.
    pub async fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    /// Effective data directory for persisted collections.
    pub fn data_dir(&self) -> AppResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> AppResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

fn serialize_byte_count<S: Serializer>(size: &ByteSize, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(size.as_u64())
}

fn project_dirs() -> anyhow::Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))
}
