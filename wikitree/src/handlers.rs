use anyhow::Context;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use wikitree_core::{Topic, TreeCache, TreeService, tree};
use wikitree_scanner::{CrawlEvent, CrawlStats, Crawler, PageSource, ProgressCallback};

pub const DEFAULT_PAGE_CEILING: usize = 20;
pub const DEFAULT_PORT: &str = "3000";

// Helper functions shared by the HTTP boundary and the crawl command

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("Missing required parameter: topic")]
    MissingTopic,

    #[error("Missing required parameter: pages")]
    MissingPages,

    #[error("pages must be a positive integer, got '{0}'")]
    InvalidPages(String),

    #[error("pages must be at most {ceiling}, got {pages}")]
    PagesAboveCeiling { pages: usize, ceiling: usize },
}

/// Validate the topic parameter: required and non-blank.
pub fn parse_topic(raw: Option<&str>) -> Result<String, QueryError> {
    match raw.map(str::trim) {
        Some(topic) if !topic.is_empty() => Ok(topic.to_string()),
        _ => Err(QueryError::MissingTopic),
    }
}

/// Validate the pages parameter: a positive integer no greater than `ceiling`.
pub fn parse_pages(raw: Option<&str>, ceiling: usize) -> Result<usize, QueryError> {
    let raw = raw.map(str::trim).ok_or(QueryError::MissingPages)?;
    if raw.is_empty() {
        return Err(QueryError::MissingPages);
    }

    let pages: usize = raw
        .parse()
        .map_err(|_| QueryError::InvalidPages(raw.to_string()))?;
    if pages == 0 {
        return Err(QueryError::InvalidPages(raw.to_string()));
    }
    if pages > ceiling {
        return Err(QueryError::PagesAboveCeiling { pages, ceiling });
    }
    Ok(pages)
}

/// Bind address for the server: the explicit value, otherwise every
/// interface on `$PORT` (default 3000).
pub fn resolve_bind(bind: Option<&str>, port: Option<String>) -> String {
    match bind {
        Some(bind) => bind.to_string(),
        None => format!(
            "0.0.0.0:{}",
            port.filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
        ),
    }
}

pub fn expand_cache_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Settings needed to put a crawler and its cache together.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub base_url: String,
    pub cache_dir: PathBuf,
    pub timeout_secs: u64,
}

pub fn build_crawler(
    options: &ServiceOptions,
    progress: Option<ProgressCallback>,
) -> anyhow::Result<Crawler> {
    let source = PageSource::with_timeout(&options.base_url, options.timeout_secs)
        .with_context(|| format!("Invalid source site {}", options.base_url))?;
    let crawler = Crawler::new(source);
    Ok(match progress {
        Some(callback) => crawler.with_progress_callback(callback),
        None => crawler,
    })
}

pub fn build_service(
    options: &ServiceOptions,
    progress: Option<ProgressCallback>,
) -> anyhow::Result<TreeService> {
    let crawler = build_crawler(options, progress)?;
    Ok(TreeService::new(crawler, TreeCache::new(options.cache_dir.clone())))
}

/// Crawl without touching the cache. The topic is lower-cased the same way
/// `TreeService` does it, so both paths fetch and report the same root.
pub async fn fresh_tree(
    options: &ServiceOptions,
    progress: Option<ProgressCallback>,
    topic: &str,
    max_pages: usize,
) -> anyhow::Result<(Vec<u8>, CrawlStats)> {
    let crawler = build_crawler(options, progress)?;
    let topic = Topic::new(topic).normalized();
    let outcome = crawler.crawl(topic.name(), max_pages).await?;
    Ok((tree::encode(&outcome.tree)?, outcome.stats))
}

/// Progress callback that appends a `.` per visited page and an `x` per
/// failed page to the spinner message.
pub fn spinner_progress(spinner: ProgressBar, label: String) -> ProgressCallback {
    let markers = Mutex::new(String::new());
    Arc::new(move |event: CrawlEvent| {
        let Ok(mut markers) = markers.lock() else {
            return;
        };
        markers.push(match event {
            CrawlEvent::Visited { .. } => '.',
            CrawlEvent::Failed { .. } => 'x',
        });
        spinner.set_message(format!("{} {}", label, markers));
        spinner.tick();
    })
}
