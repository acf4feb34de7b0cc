use wikitree_scanner::{CrawlStats, TopicNode};

/// Indented text rendering of a crawl tree.
pub fn render_tree(tree: &TopicNode) -> String {
    let mut out = String::new();
    out.push_str(&tree.value);
    out.push('\n');
    render_children(&tree.children, "", &mut out);
    out
}

fn render_children(children: &[TopicNode], prefix: &str, out: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└── " } else { "├── " });
        out.push_str(&child.value);
        out.push('\n');

        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(&child.children, &nested, out);
    }
}

pub fn render_summary(stats: &CrawlStats) -> String {
    let mut report = String::new();
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Topics crawled: {}\n", stats.topics_discovered));
    report.push_str(&format!("  Pages crawled: {}\n", stats.pages_visited));
    report.push_str(&format!("  Failed pages: {}\n", stats.failed_pages));
    report.push_str(&format!("  Leftover topics: {}\n", stats.leftover));
    report
}
