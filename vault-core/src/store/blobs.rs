//! Session-scoped upload bytes, keyed by [`ContentRef`].
//!
//! Nothing here survives the process. A reloaded record whose blob is gone
//! simply has no readable content.

use std::collections::HashMap;

use bytes::Bytes;

use crate::model::records::ContentRef;

#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<ContentRef, Bytes>,
}

impl BlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` under a fresh handle.
    pub fn put(&mut self, content: Bytes) -> ContentRef {
        let handle = ContentRef::fresh();
        self.blobs.insert(handle.clone(), content);
        handle
    }

    #[must_use]
    pub fn get(&self, handle: &ContentRef) -> Option<Bytes> {
        // Bytes clones are refcount bumps
        self.blobs.get(handle).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let mut blobs = BlobStore::new();
        let handle = blobs.put(Bytes::from_static(b"hello"));

        assert!(handle.as_str().starts_with("blob:"));
        assert_eq!(blobs.get(&handle).unwrap(), Bytes::from_static(b"hello"));
        assert!(blobs.get(&ContentRef::fresh()).is_none());
    }
}
