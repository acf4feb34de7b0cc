use crate::cache::TreeCache;
use crate::error::Result;
use crate::topic::Topic;
use crate::tree;
use tracing::{info, warn};
use wikitree_scanner::{CrawlStats, Crawler};

/// Encoded tree handed back to a caller.
#[derive(Debug, Clone)]
pub struct TreeResponse {
    pub json: Vec<u8>,
    pub from_cache: bool,
    /// Only present for fresh crawls.
    pub stats: Option<CrawlStats>,
}

/// Request pipeline: cache lookup, then crawl, encode and store on a miss.
pub struct TreeService {
    crawler: Crawler,
    cache: TreeCache,
}

impl TreeService {
    pub fn new(crawler: Crawler, cache: TreeCache) -> Self {
        Self { crawler, cache }
    }

    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    pub fn crawler(&self) -> &Crawler {
        &self.crawler
    }

    /// Encoded tree for (topic, max_pages).
    ///
    /// The topic is lower-cased once, so the cache key, the pages fetched
    /// and the stored root value all agree. `max_pages` is expected to be
    /// validated by the caller.
    pub async fn tree_json(&self, topic: &str, max_pages: usize) -> Result<TreeResponse> {
        let topic = Topic::new(topic).normalized();

        if let Some(json) = self.cache.lookup(&topic, max_pages).await {
            info!("Serving {} ({} pages) from cache", topic, max_pages);
            return Ok(TreeResponse {
                json,
                from_cache: true,
                stats: None,
            });
        }

        let outcome = self.crawler.crawl(topic.name(), max_pages).await?;
        let json = tree::encode(&outcome.tree)?;

        if let Err(e) = self.cache.store(&topic, max_pages, &json).await {
            warn!("Could not cache tree for {}: {}", topic, e);
        }

        Ok(TreeResponse {
            json,
            from_cache: false,
            stats: Some(outcome.stats),
        })
    }
}
