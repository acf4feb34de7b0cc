//! Canonical JSON form of a crawl tree.
//!
//! `{"val": "<topic>", "children": [ ... ]}`, compact, children in discovery
//! order. The field names are persisted in the cache, so they must not change.

use crate::error::Result;
use wikitree_scanner::TopicNode;

pub fn encode(tree: &TopicNode) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(tree)?)
}

pub fn decode(bytes: &[u8]) -> Result<TopicNode> {
    Ok(serde_json::from_slice(bytes)?)
}
