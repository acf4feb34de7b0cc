pub mod handlers;
pub mod server;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    QueryError, ServiceOptions, build_crawler, build_service, expand_cache_dir, fresh_tree,
    parse_pages, parse_topic, resolve_bind,
};

// Re-export rendering from wikitree-core
pub use wikitree_core::report::{render_summary, render_tree};
