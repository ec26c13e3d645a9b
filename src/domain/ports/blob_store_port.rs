//! Port definition for the persistent blob store.

use async_trait::async_trait;

use crate::domain::entities::CacheKey;
use crate::domain::errors::ImageResult;

/// Maps cache keys to already transcoded image blobs.
/// Implementations must be thread-safe and must never expose a partially
/// written blob to a concurrent reader.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns true if a blob for `key` is present.
    async fn exists(&self, key: &CacheKey) -> bool;

    /// Reads the blob for `key`.
    async fn read(&self, key: &CacheKey) -> ImageResult<Vec<u8>>;

    /// Persists the blob for `key`, replacing any previous one.
    async fn write(&self, key: &CacheKey, bytes: &[u8]) -> ImageResult<()>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::errors::ImageError;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory blob store for testing.
    #[derive(Default)]
    pub struct MemoryBlobStore {
        blobs: Mutex<HashMap<CacheKey, Vec<u8>>>,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
        writes: AtomicUsize,
    }

    impl MemoryBlobStore {
        /// Creates an empty store.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a store whose writes always fail.
        pub fn read_only() -> Self {
            let store = Self::default();
            store.fail_writes.store(true, Ordering::SeqCst);
            store
        }

        /// Creates a store that reports blobs as present but fails to read
        /// them, like a file that exists but cannot be opened.
        pub fn unreadable() -> Self {
            let store = Self::default();
            store.fail_reads.store(true, Ordering::SeqCst);
            store
        }

        /// Seeds a blob directly.
        pub fn insert(&self, key: CacheKey, bytes: Vec<u8>) {
            self.blobs.lock().insert(key, bytes);
        }

        /// Number of stored blobs.
        pub fn len(&self) -> usize {
            self.blobs.lock().len()
        }

        /// Number of write attempts.
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Returns a copy of the blob for `key`.
        pub fn get(&self, key: &CacheKey) -> Option<Vec<u8>> {
            self.blobs.lock().get(key).cloned()
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn exists(&self, key: &CacheKey) -> bool {
            self.blobs.lock().contains_key(key)
        }

        async fn read(&self, key: &CacheKey) -> ImageResult<Vec<u8>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(ImageError::storage("permission denied"));
            }
            self.get(key)
                .ok_or_else(|| ImageError::storage(format!("no blob for {key}")))
        }

        async fn write(&self, key: &CacheKey, bytes: &[u8]) -> ImageResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ImageError::storage("read-only file system"));
            }
            self.blobs.lock().insert(key.clone(), bytes.to_vec());
            Ok(())
        }
    }
}
