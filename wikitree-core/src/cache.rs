//! On-disk cache of encoded crawl trees.
//!
//! One file per (topic key, page budget):
//!
//! ```text
//! {root}/
//! ├── bees-1.json
//! ├── bees-5.json
//! └── honey+bee-20.json
//! ```
//!
//! Entries never expire. A missing or unreadable entry is a miss.

use crate::error::CacheError;
use crate::topic::Topic;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::form_urlencoded;

#[derive(Debug, Clone)]
pub struct TreeCache {
    root_dir: PathBuf,
}

impl TreeCache {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// File name for a cache key. The topic key is form-urlencoded so it is
    /// always a single path component.
    pub fn file_name(topic: &Topic, max_pages: usize) -> String {
        let key: String = form_urlencoded::byte_serialize(topic.key().as_bytes()).collect();
        format!("{}-{}.json", key, max_pages)
    }

    pub fn entry_path(&self, topic: &Topic, max_pages: usize) -> PathBuf {
        self.root_dir.join(Self::file_name(topic, max_pages))
    }

    /// Read a stored tree. Any failure to read is reported as a miss.
    pub async fn lookup(&self, topic: &Topic, max_pages: usize) -> Option<Vec<u8>> {
        let path = self.entry_path(topic, max_pages);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Cache hit: {}", path.display());
                Some(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache miss: {}", path.display());
                None
            }
            Err(e) => {
                warn!("Cache entry {} unreadable, treating as miss: {}", path.display(), e);
                None
            }
        }
    }

    /// Persist an encoded tree. Each writer gets its own temp file in the
    /// cache directory, renamed over the entry once complete, so concurrent
    /// stores of one key never see each other's partial output.
    pub async fn store(
        &self,
        topic: &Topic,
        max_pages: usize,
        bytes: &[u8],
    ) -> Result<PathBuf, CacheError> {
        let path = self.entry_path(topic, max_pages);
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.display().to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.root_dir).await.map_err(io_err)?;

        let root_dir = self.root_dir.clone();
        let target = path.clone();
        let contents = bytes.to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&root_dir)?;
            tmp.write_all(&contents)?;
            tmp.flush()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| io_err(std::io::Error::other(e)))?
        .map_err(io_err)?;

        debug!("Cached {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_uses_lower_case_key() {
        assert_eq!(TreeCache::file_name(&Topic::new("Bees"), 5), "bees-5.json");
        assert_eq!(
            TreeCache::file_name(&Topic::new("bees"), 5),
            TreeCache::file_name(&Topic::new("BEES"), 5)
        );
    }

    #[test]
    fn test_file_name_is_single_component() {
        let name = TreeCache::file_name(&Topic::new("../AC/DC"), 3);
        assert!(!name.contains('/'));
        assert_eq!(name, "..%2Fac%2Fdc-3.json");
    }

    #[test]
    fn test_file_name_distinguishes_budgets() {
        let topic = Topic::new("Bees");
        assert_ne!(TreeCache::file_name(&topic, 1), TreeCache::file_name(&topic, 10));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stores_of_one_key_do_not_collide() {
        let dir = tempfile::TempDir::new().unwrap();
        let cache = TreeCache::new(dir.path());
        let topic = Topic::new("Bees");

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let cache = cache.clone();
                let topic = topic.clone();
                tokio::spawn(async move {
                    let body =
                        format!(r#"{{"val":"bees","children":[{{"val":"{}","children":[]}}]}}"#, i);
                    cache.store(&topic, 3, body.as_bytes()).await.map(|_| body)
                })
            })
            .collect();

        let mut written = Vec::new();
        for writer in writers {
            written.push(writer.await.unwrap().unwrap());
        }

        let stored = cache.lookup(&topic, 3).await.unwrap();
        assert!(written.iter().any(|body| body.as_bytes() == stored.as_slice()));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.as_os_str() != "bees-3.json")
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
    }
}
