use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Page not found: {url} returned {status}")]
    NotFound { url: String, status: u16 },

    #[error("Response content type was {0} not text/html")]
    UnsupportedContent(String),

    #[error("Topic does not exist: {0}")]
    TopicNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read page body: {0}")]
    Body(String),
}

impl ScanError {
    /// True when the error means "bad input" rather than "service trouble".
    pub fn is_topic_not_found(&self) -> bool {
        matches!(self, ScanError::TopicNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
