//! A simple artifact cache for crucible
//! Stores raw compiler artifacts on disk, keyed by compiler version string
//! Entries are never invalidated or evicted; a re-put overwrites in place

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use error::Error;
use util::*;

pub mod error;
pub(crate) mod util;

/// The default cache directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".solc_cache";

/// A store of raw compiler artifacts keyed by version string.
///
/// The filesystem implementation is [`FsCache`]; [`MemoryCache`] backs tests
/// that should not touch the disk.
pub trait ArtifactCache {
    /// Read the artifact stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Store `contents` under `key`, overwriting any previous entry.
    fn put(&self, key: &str, contents: &[u8]) -> Result<(), Error>;

    /// Check whether an artifact is stored under `key`.
    fn exists(&self, key: &str) -> Result<bool, Error> {
        Ok(self.get(key)?.is_some())
    }
}

/// A filesystem-backed [`ArtifactCache`], one file per key under a root
/// directory. The root is created on first write.
///
/// ```
/// use crucible_cache::{ArtifactCache, FsCache};
///
/// let cache = FsCache::new(std::env::temp_dir().join("fs_cache_doc"));
/// cache.put("0.8.24+commit.e11b9ed9", b"artifact").expect("!");
/// assert!(cache.exists("0.8.24+commit.e11b9ed9").expect("!"));
/// ```
#[derive(Debug, Clone)]
pub struct FsCache {
    root: PathBuf,
}

impl Default for FsCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

impl FsCache {
    /// Create a cache rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The path an artifact for `key` is (or would be) stored at.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all cached keys, sorted alphabetically. A cache that has not been
    /// written to yet lists no keys.
    pub fn keys(&self) -> Result<Vec<String>, Error> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in self
            .root
            .read_dir()
            .map_err(|e| Error::Generic(format!("failed to read cache directory: {e:?}")))?
        {
            let entry =
                entry.map_err(|e| Error::Generic(format!("failed to read cache entry: {e:?}")))?;
            let key = entry
                .path()
                .file_name()
                .ok_or_else(|| Error::Generic("failed to get file name".to_string()))?
                .to_str()
                .ok_or_else(|| Error::Generic("failed to convert path to string".to_string()))?
                .to_string();
            keys.push(key);
        }

        // sort keys alphabetically
        keys.sort();

        Ok(keys)
    }

    /// Delete the artifact stored under `key`, if any.
    pub fn delete(&self, key: &str) -> Result<(), Error> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)
                .map_err(|e| Error::Generic(format!("failed to delete cache file: {e:?}")))?;
        }

        Ok(())
    }

    /// Clear the cache, removing all stored artifacts.
    pub fn clear(&self) -> Result<(), Error> {
        for key in self.keys()? {
            self.delete(&key)?;
        }

        Ok(())
    }
}

impl ArtifactCache for FsCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        read_bytes(&path).map(Some)
    }

    fn put(&self, key: &str, contents: &[u8]) -> Result<(), Error> {
        write_bytes(&self.path_for(key), contents)
    }

    fn exists(&self, key: &str) -> Result<bool, Error> {
        Ok(self.path_for(key).exists())
    }
}

/// An in-memory [`ArtifactCache`] used by tests that must not touch the disk
/// or the network.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Create an empty in-memory cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let entries =
            self.entries.lock().map_err(|_| Error::Generic("cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, contents: &[u8]) -> Result<(), Error> {
        let mut entries =
            self.entries.lock().map_err(|_| Error::Generic("cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), contents.to_vec());
        Ok(())
    }
}

/// Takes a key and an async function producing the artifact bytes for it. \
/// If the key exists in the cache, returns the stored artifact; otherwise the
/// function is awaited and its result is stored under the key and returned.
pub async fn with_artifact<C, F, Fut>(cache: &C, key: &str, func: F) -> eyre::Result<Vec<u8>>
where
    C: ArtifactCache + ?Sized,
    F: FnOnce() -> Fut + Send,
    Fut: std::future::Future<Output = Result<Vec<u8>, eyre::Report>> + Send, {
    match cache.get(key) {
        Ok(Some(cached_value)) => {
            tracing::debug!("cache hit for key: '{}'", key);
            Ok(cached_value)
        }
        Ok(None) | Err(_) => {
            tracing::debug!("cache miss for key: '{}'", key);

            let value = func().await?;
            cache.put(key, &value)?;

            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{with_artifact, ArtifactCache, FsCache, MemoryCache};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_cache(name: &str) -> FsCache {
        let cache = FsCache::new(std::env::temp_dir().join("crucible-cache-tests").join(name));
        cache.clear().expect("failed to clear cache");
        cache
    }

    #[test]
    fn test_put_creates_file() {
        let cache = test_cache("put");
        cache.put("0.8.24+commit.e11b9ed9", b"solc binary").expect("failed to put");

        assert!(cache.path_for("0.8.24+commit.e11b9ed9").exists());
    }

    #[test]
    fn test_get_roundtrip() {
        let cache = test_cache("roundtrip");
        cache.put("0.4.24+commit.e67f0147", b"solc binary").expect("failed to put");

        let value = cache.get("0.4.24+commit.e67f0147").expect("failed to get");
        assert_eq!(value, Some(b"solc binary".to_vec()));
    }

    #[test]
    fn test_get_missing_key() {
        let cache = test_cache("missing");
        assert_eq!(cache.get("0.0.0").expect("failed to get"), None);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = test_cache("overwrite");
        cache.put("0.8.24", b"first").expect("failed to put");
        cache.put("0.8.24", b"second").expect("failed to put");

        assert_eq!(cache.get("0.8.24").expect("failed to get"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_keys_sorted() {
        let cache = test_cache("keys");
        cache.put("0.8.24", b"a").expect("failed to put");
        cache.put("0.4.11", b"b").expect("failed to put");
        cache.put("0.6.12", b"c").expect("failed to put");

        assert_eq!(cache.keys().expect("failed to get keys"), vec!["0.4.11", "0.6.12", "0.8.24"]);
    }

    #[test]
    fn test_exists_and_delete() {
        let cache = test_cache("exists");
        assert!(!cache.exists("0.8.24").expect("failed to check key"));
        cache.put("0.8.24", b"artifact").expect("failed to put");
        assert!(cache.exists("0.8.24").expect("failed to check key"));
        cache.delete("0.8.24").expect("failed to delete");
        assert!(!cache.exists("0.8.24").expect("failed to check key"));
    }

    #[test]
    fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        cache.put("0.8.24", b"artifact").expect("failed to put");

        assert!(cache.exists("0.8.24").expect("failed to check key"));
        assert_eq!(cache.get("0.8.24").expect("failed to get"), Some(b"artifact".to_vec()));
        assert_eq!(cache.get("0.8.23").expect("failed to get"), None);
    }

    #[tokio::test]
    async fn test_with_artifact_loads_once() {
        let cache = MemoryCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = with_artifact(&cache, "0.8.24", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(b"artifact".to_vec())
            })
            .await
            .expect("with_artifact failed");

            assert_eq!(value, b"artifact".to_vec());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
