use crate::error::{Result, ScanError};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/wiki";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maps topics to page URLs on the source encyclopedia and fetches them.
#[derive(Clone, Debug)]
pub struct PageSource {
    client: Client,
    base: Url,
}

impl PageSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ScanError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("wikitree/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Page URL for a topic: the base URL with the topic appended as a
    /// single path segment.
    pub fn page_url(&self, topic: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ScanError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(topic);
        Ok(url)
    }

    /// Preliminary reachability check for a crawl root.
    pub async fn probe(&self, topic: &str) -> Result<()> {
        let url = self.page_url(topic)?;
        debug!("Probing {}", url);

        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            debug!("Probe for {} returned {}", topic, response.status());
            return Err(ScanError::TopicNotFound(topic.to_string()));
        }
        Ok(())
    }

    /// Fetch the page for a topic, returning the unread response so the body
    /// can be streamed.
    pub async fn fetch(&self, topic: &str) -> Result<Response> {
        let url = self.page_url(topic)?;
        debug!("Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScanError::NotFound {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("text/html") {
            return Err(ScanError::UnsupportedContent(content_type));
        }

        Ok(response)
    }
}
