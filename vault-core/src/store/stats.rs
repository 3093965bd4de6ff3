//! Storage usage summary: total bytes against a quota, broken down by
//! [`StorageCategory`].
//!
//! Trashed files count toward usage; nothing is purged.

use bytesize::ByteSize;
use enum_map::EnumMap;
use serde::Serialize;

use crate::model::records::StorageCategory;
use crate::store::{backend::KeyValueBackend, entity_store::EntityStore};
use crate::util::humanize::{format_file_size, percent_of};

pub const DEFAULT_STORAGE_LIMIT: ByteSize = ByteSize::gib(10);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    pub count: u64,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageStats {
    pub used: u64,
    pub limit: u64,
    pub percent_used: f64,
    pub by_category: EnumMap<StorageCategory, CategoryUsage>,
}

impl StorageStats {
    #[must_use]
    pub fn is_over_limit(&self) -> bool {
        self.used > self.limit
    }

    /// "used / limit" in display units.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} / {} ({:.1}% used)",
            format_file_size(self.used),
            format_file_size(self.limit),
            self.percent_used
        )
    }
}

impl<B: KeyValueBackend> EntityStore<B> {
    #[must_use]
    pub fn storage_stats(&self, limit: ByteSize) -> StorageStats {
        let mut by_category: EnumMap<StorageCategory, CategoryUsage> = EnumMap::default();
        let mut used: u64 = 0;

        for file in &self.files {
            let usage = &mut by_category[file.category()];
            usage.count += 1;
            usage.bytes = usage.bytes.saturating_add(file.size);
            used = used.saturating_add(file.size);
        }

        StorageStats {
            used,
            limit: limit.as_u64(),
            percent_used: percent_of(used, limit.as_u64()),
            by_category,
        }
    }
}
