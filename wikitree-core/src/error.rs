use thiserror::Error;
use wikitree_scanner::ScanError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to encode tree: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl CoreError {
    /// True when the root topic does not exist on the source site.
    pub fn is_topic_not_found(&self) -> bool {
        matches!(self, CoreError::Scan(e) if e.is_topic_not_found())
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
