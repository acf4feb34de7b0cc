use crate::error::Result;
use crate::extract::extract_see_also;
use crate::result::{CrawlEvent, CrawlOutcome, CrawlStats, TopicNode};
use crate::source::PageSource;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(CrawlEvent) + Send + Sync>;

/// Node under construction. Children are indices into the crawl arena.
struct PendingNode {
    value: String,
    children: Vec<usize>,
}

impl PendingNode {
    fn new(value: String) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }
}

/// Bounded breadth-first crawler over "See also" links.
pub struct Crawler {
    source: PageSource,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(source: PageSource) -> Self {
        Self {
            source,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn source(&self) -> &PageSource {
        &self.source
    }

    /// Crawl outward from `root_topic` until `max_pages` pages have been
    /// fetched or the queue runs dry.
    ///
    /// The root page must exist; a failed fetch of any later page is counted
    /// and skipped. Topics discovered on the last page fetched are kept in
    /// the tree even though they are never visited themselves.
    pub async fn crawl(&self, root_topic: &str, max_pages: usize) -> Result<CrawlOutcome> {
        info!("Starting crawl of {} with a budget of {} pages", root_topic, max_pages);

        self.source.probe(root_topic).await?;

        let mut arena = vec![PendingNode::new(root_topic.to_string())];
        let mut queue = VecDeque::from([0usize]);
        let mut stats = CrawlStats::default();

        while stats.pages_visited < max_pages
            && let Some(index) = queue.pop_front()
        {
            let topic = arena[index].value.clone();

            match extract_see_also(&self.source, &topic).await {
                Ok(links) => {
                    debug!("{} lists {} related topics", topic, links.len());
                    self.notify(CrawlEvent::Visited {
                        topic,
                        links: links.len(),
                    });

                    for link in links {
                        arena.push(PendingNode::new(link));
                        let child = arena.len() - 1;
                        arena[index].children.push(child);
                        queue.push_back(child);
                        stats.topics_discovered += 1;
                    }
                }
                Err(e) => {
                    warn!("Failed to extract links from {}: {}", topic, e);
                    stats.failed_pages += 1;
                    self.notify(CrawlEvent::Failed {
                        topic,
                        error: e.to_string(),
                    });
                }
            }

            stats.pages_visited += 1;
        }

        stats.leftover = queue.len();
        info!(
            "Crawl complete. Visited {} pages, discovered {} topics, {} left over",
            stats.pages_visited, stats.topics_discovered, stats.leftover
        );

        Ok(CrawlOutcome {
            tree: assemble(&mut arena, 0),
            stats,
        })
    }

    fn notify(&self, event: CrawlEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }
}

fn assemble(arena: &mut [PendingNode], index: usize) -> TopicNode {
    let value = std::mem::take(&mut arena[index].value);
    let children = std::mem::take(&mut arena[index].children);
    TopicNode::with_children(
        value,
        children
            .into_iter()
            .map(|child| assemble(arena, child))
            .collect(),
    )
}
