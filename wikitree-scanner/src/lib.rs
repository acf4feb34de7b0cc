pub mod crawler;
pub mod error;
pub mod extract;
pub mod result;
pub mod source;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use extract::{extract_see_also, scan_see_also};
pub use result::{CrawlEvent, CrawlOutcome, CrawlStats, TopicNode};
pub use source::PageSource;
