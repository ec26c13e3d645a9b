//! Disk-based blob store for transcoded images.
//!
//! Flat directory of `{key}.{ext}` files. Existence is discovered by probing
//! the path for a key; there is no index and nothing is ever evicted.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, trace, warn};

use crate::domain::entities::CacheKey;
use crate::domain::errors::{ImageError, ImageResult};
use crate::domain::ports::BlobStore;

use super::transcoder::STORAGE_EXTENSION;

/// Disk-based cache that persists transcoded image blobs.
#[derive(Debug, Clone)]
pub struct DiskImageCache {
    cache_dir: PathBuf,
}

impl DiskImageCache {
    /// Creates a cache rooted at `cache_dir`.
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Creates a cache in the default location (e.g. ~/.cache/card-gallery/images/).
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(dirs_cache_path())
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path for a cached blob.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{STORAGE_EXTENSION}", key.as_str()))
    }

    /// Returns the number of cached blobs.
    pub async fn len(&self) -> usize {
        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return 0;
        };

        let mut count = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry
                .path()
                .extension()
                .is_some_and(|ext| ext == STORAGE_EXTENSION)
            {
                count += 1;
            }
        }
        count
    }

    /// Returns true if nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStore for DiskImageCache {
    async fn exists(&self, key: &CacheKey) -> bool {
        let path = self.path_for(key);
        fs::metadata(&path).await.is_ok_and(|meta| meta.is_file())
    }

    async fn read(&self, key: &CacheKey) -> ImageResult<Vec<u8>> {
        let path = self.path_for(key);
        let bytes = fs::read(&path).await.map_err(|e| {
            trace!(key = %key, error = %e, "Disk cache miss");
            ImageError::storage(format!("failed to read {}: {e}", path.display()))
        })?;

        if bytes.is_empty() {
            warn!(key = %key, path = %path.display(), "Cached blob is empty");
            return Err(ImageError::storage(format!(
                "cached blob {} is empty",
                path.display()
            )));
        }

        trace!(key = %key, path = %path.display(), "Disk cache hit");
        Ok(bytes)
    }

    async fn write(&self, key: &CacheKey, bytes: &[u8]) -> ImageResult<()> {
        let cache_dir = self.cache_dir.clone();
        let path = self.path_for(key);
        let data = bytes.to_vec();

        let target = path.clone();
        tokio::task::spawn_blocking(move || persist_atomically(&cache_dir, &target, &data))
            .await
            .map_err(|e| ImageError::storage(format!("write task panicked: {e}")))??;

        debug!(key = %key, path = %path.display(), size = bytes.len(), "Stored image in disk cache");
        Ok(())
    }
}

/// Writes into a temp file next to `path` and renames it over `path`, so a
/// concurrent reader sees either the previous complete file or the new one.
fn persist_atomically(cache_dir: &Path, path: &Path, data: &[u8]) -> ImageResult<()> {
    std::fs::create_dir_all(cache_dir)
        .map_err(|e| ImageError::storage(format!("failed to create cache dir: {e}")))?;

    let mut temp_file = tempfile::NamedTempFile::new_in(cache_dir)
        .map_err(|e| ImageError::storage(format!("failed to create temp file: {e}")))?;
    temp_file
        .write_all(data)
        .map_err(|e| ImageError::storage(format!("failed to write cache file: {e}")))?;
    temp_file
        .flush()
        .map_err(|e| ImageError::storage(format!("failed to flush cache file: {e}")))?;
    temp_file
        .persist(path)
        .map_err(|e| ImageError::storage(format!("failed to persist cache file: {}", e.error)))?;

    Ok(())
}

/// Returns the default cache directory path.
fn dirs_cache_path() -> PathBuf {
    directories::ProjectDirs::from("com", "linuxmobile", "card-gallery").map_or_else(
        || {
            std::env::temp_dir()
                .join("card-gallery")
                .join("cache")
                .join("images")
        },
        |dirs| dirs.cache_dir().join("images"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (DiskImageCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskImageCache::new(temp_dir.path().join("images"));
        (cache, temp_dir)
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (cache, _temp) = create_test_cache();
        let key = CacheKey::from_url("https://example.com/a.png");

        cache.write(&key, b"encoded image").await.unwrap();

        assert!(cache.exists(&key).await);
        assert_eq!(cache.read(&key).await.unwrap(), b"encoded image");
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let (cache, _temp) = create_test_cache();
        let key = CacheKey::from_url("https://example.com/missing.png");

        assert!(!cache.exists(&key).await);
        let err = cache.read(&key).await.unwrap_err();
        assert!(err.is_storage_error());
    }

    #[tokio::test]
    async fn test_directory_created_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("cache");
        let cache = DiskImageCache::new(&dir);
        assert!(!dir.exists());
        assert!(cache.is_empty().await);

        let key = CacheKey::from_url("https://example.com/a.png");
        cache.write(&key, b"one").await.unwrap();
        cache.write(&key, b"two").await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.read(&key).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_file_layout() {
        let (cache, _temp) = create_test_cache();
        let key = CacheKey::from_url("https://example.com/a.png");
        cache.write(&key, b"data").await.unwrap();

        let expected = cache
            .cache_dir()
            .join(format!("{}.{STORAGE_EXTENSION}", key.as_str()));
        assert_eq!(cache.path_for(&key), expected);
        assert!(expected.is_file());

        let names: Vec<_> = std::fs::read_dir(cache.cache_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1, "no temp files left behind: {names:?}");
    }

    #[tokio::test]
    async fn test_empty_blob_is_unreadable() {
        let (cache, _temp) = create_test_cache();
        let key = CacheKey::from_url("https://example.com/a.png");
        std::fs::create_dir_all(cache.cache_dir()).unwrap();
        std::fs::write(cache.path_for(&key), b"").unwrap();

        assert!(cache.exists(&key).await);
        assert!(cache.read(&key).await.unwrap_err().is_storage_error());
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let cache = DiskImageCache::new(blocker.join("images"));

        let key = CacheKey::from_url("https://example.com/a.png");
        let err = cache.write(&key, b"data").await.unwrap_err();

        assert!(err.is_storage_error());
        assert!(!cache.exists(&key).await);
    }

    #[tokio::test]
    async fn test_concurrent_writes_same_key() {
        let (cache, _temp) = create_test_cache();
        let key = CacheKey::from_url("https://example.com/a.png");
        let payload = vec![7u8; 64 * 1024];

        let writes = (0..8).map(|_| {
            let cache = cache.clone();
            let key = key.clone();
            let payload = payload.clone();
            tokio::spawn(async move { cache.write(&key, &payload).await })
        });
        for handle in writes {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.read(&key).await.unwrap(), payload);
    }
}
