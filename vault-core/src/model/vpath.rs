//! `src/model/vpath.rs`
//! ============================================================================
//! # `VirtualPath`: slash-delimited directory names in the vault namespace
//!
//! Not a filesystem path. Always starts with `/`, never ends with one unless it
//! is the root, and never contains empty segments.

use std::fmt;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AppError, AppResult};

const ROOT: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath(CompactString);

impl VirtualPath {
    #[must_use]
    pub const fn root() -> Self {
        Self(CompactString::const_new(ROOT))
    }

    /// Parse and normalise user text. Duplicate and trailing slashes are
    /// collapsed; a missing leading slash is rejected.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();

        if !trimmed.starts_with('/') {
            return Err(AppError::invalid_path(raw, "must start with '/'"));
        }

        let mut normalised = CompactString::default();
        for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
            normalised.push('/');
            normalised.push_str(segment);
        }

        if normalised.is_empty() {
            return Ok(Self::root());
        }

        Ok(Self(normalised))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of a child directory named `name` directly under `self`.
    #[must_use]
    pub fn join(&self, name: &str) -> Self {
        let name = name.trim_matches('/');
        if name.is_empty() {
            return self.clone();
        }

        if self.is_root() {
            Self(format_compact!("/{name}"))
        } else {
            Self(format_compact!("{}/{name}", self.0))
        }
    }

    /// Non-empty segments from root to leaf.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        match self.0.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(CompactString::from(&self.0[..idx]))),
        }
    }

    /// True if `self` is `other` or lies anywhere beneath it.
    #[must_use]
    pub fn starts_with(&self, other: &Self) -> bool {
        if other.is_root() || self == other {
            return true;
        }

        self.0
            .strip_prefix(other.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl Default for VirtualPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VirtualPath {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VirtualPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VirtualPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = CompactString::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
