use serde::{Deserialize, Deserializer, Serialize};

/// One visited-or-discovered topic in a crawl tree.
///
/// Children are owned by their parent. A topic reached along two paths shows
/// up as two distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    #[serde(rename = "val")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<TopicNode>,
}

impl TopicNode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(value: impl Into<String>, children: Vec<TopicNode>) -> Self {
        Self {
            value: value.into(),
            children,
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TopicNode::node_count).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TopicNode::depth).max().unwrap_or(0)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TopicNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<TopicNode>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Extraction attempts made, successful or not.
    pub pages_visited: usize,
    pub topics_discovered: usize,
    pub failed_pages: usize,
    /// Topics still queued when the page budget ran out.
    pub leftover: usize,
}

#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub tree: TopicNode,
    pub stats: CrawlStats,
}

/// Progress notifications emitted once per visited page.
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    Visited { topic: String, links: usize },
    Failed { topic: String, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_and_depth() {
        let tree = TopicNode::with_children(
            "Bees",
            vec![
                TopicNode::with_children("Superorganism", vec![TopicNode::new("Ant")]),
                TopicNode::new("Honey"),
            ],
        );
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.is_leaf());
        assert!(tree.children[1].is_leaf());
    }

    #[test]
    fn test_null_children_deserialize_as_empty() {
        let node: TopicNode = serde_json::from_str(r#"{"val":"Bees","children":null}"#).unwrap();
        assert_eq!(node, TopicNode::new("Bees"));

        let node: TopicNode = serde_json::from_str(r#"{"val":"Bees"}"#).unwrap();
        assert!(node.children.is_empty());
    }
}
