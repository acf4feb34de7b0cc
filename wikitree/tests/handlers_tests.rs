// Tests for the shared request validation and wiring helpers

use indicatif::ProgressBar;
use std::path::PathBuf;
use tempfile::TempDir;
use wikitree::handlers::{DEFAULT_PAGE_CEILING, spinner_progress};
use wikitree::{
    QueryError, ServiceOptions, build_service, expand_cache_dir, fresh_tree, parse_pages,
    parse_topic, resolve_bind,
};
use wikitree_core::tree;
use wikitree_scanner::{CrawlEvent, TopicNode};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[test]
fn test_parse_topic_requires_a_value() {
    assert_eq!(parse_topic(None), Err(QueryError::MissingTopic));
    assert_eq!(parse_topic(Some("")), Err(QueryError::MissingTopic));
    assert_eq!(parse_topic(Some("   ")), Err(QueryError::MissingTopic));
}

#[test]
fn test_parse_topic_trims_whitespace() {
    assert_eq!(parse_topic(Some("  Bees ")).unwrap(), "Bees");
    assert_eq!(parse_topic(Some("Honey_bee")).unwrap(), "Honey_bee");
}

#[test]
fn test_parse_pages_accepts_range() {
    assert_eq!(parse_pages(Some("1"), DEFAULT_PAGE_CEILING).unwrap(), 1);
    assert_eq!(parse_pages(Some(" 3 "), DEFAULT_PAGE_CEILING).unwrap(), 3);
    assert_eq!(parse_pages(Some("20"), DEFAULT_PAGE_CEILING).unwrap(), 20);
}

#[test]
fn test_parse_pages_rejects_missing() {
    assert_eq!(parse_pages(None, 20), Err(QueryError::MissingPages));
    assert_eq!(parse_pages(Some(""), 20), Err(QueryError::MissingPages));
}

#[test]
fn test_parse_pages_rejects_non_positive_and_garbage() {
    for raw in ["0", "-1", "abc", "2.5", "1e3"] {
        assert_eq!(
            parse_pages(Some(raw), 20),
            Err(QueryError::InvalidPages(raw.to_string())),
            "expected {} to be rejected",
            raw
        );
    }
}

#[test]
fn test_parse_pages_enforces_ceiling() {
    assert_eq!(
        parse_pages(Some("25"), 20),
        Err(QueryError::PagesAboveCeiling {
            pages: 25,
            ceiling: 20
        })
    );
    // A raised ceiling lets the same request through
    assert_eq!(parse_pages(Some("25"), 50).unwrap(), 25);
}

#[test]
fn test_query_error_messages() {
    assert_eq!(
        QueryError::MissingTopic.to_string(),
        "Missing required parameter: topic"
    );
    assert_eq!(
        QueryError::PagesAboveCeiling {
            pages: 25,
            ceiling: 20
        }
        .to_string(),
        "pages must be at most 20, got 25"
    );
}

#[test]
fn test_resolve_bind() {
    assert_eq!(resolve_bind(Some("127.0.0.1:8080"), None), "127.0.0.1:8080");
    assert_eq!(
        resolve_bind(Some("127.0.0.1:8080"), Some("9000".to_string())),
        "127.0.0.1:8080"
    );
    assert_eq!(resolve_bind(None, Some("9000".to_string())), "0.0.0.0:9000");
    assert_eq!(resolve_bind(None, None), "0.0.0.0:3000");
    assert_eq!(resolve_bind(None, Some("  ".to_string())), "0.0.0.0:3000");
}

#[test]
fn test_expand_cache_dir_leaves_plain_paths() {
    assert_eq!(
        expand_cache_dir("/var/cache/wikitree"),
        PathBuf::from("/var/cache/wikitree")
    );
    assert_eq!(expand_cache_dir("static/cache"), PathBuf::from("static/cache"));
}

#[test]
fn test_spinner_progress_marks_each_page() {
    let spinner = ProgressBar::hidden();
    let callback = spinner_progress(spinner.clone(), "Crawling Bees".to_string());

    callback(CrawlEvent::Visited {
        topic: "Bees".to_string(),
        links: 2,
    });
    callback(CrawlEvent::Failed {
        topic: "Dead_link".to_string(),
        error: "404".to_string(),
    });
    callback(CrawlEvent::Visited {
        topic: "Honey".to_string(),
        links: 0,
    });

    assert_eq!(spinner.message(), "Crawling Bees .x.");
}

fn options(server: &MockServer, cache_dir: &TempDir) -> ServiceOptions {
    ServiceOptions {
        base_url: format!("{}/wiki", server.uri()),
        cache_dir: cache_dir.path().to_path_buf(),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_uncached_crawl_uses_same_root_as_cached_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/bees"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(
                    r#"<span id="See_also"></span><ul><li><a title="Honey">h</a></li></ul>"#,
                ),
        )
        .mount(&server)
        .await;
    // Fetching the page as typed would mean the topic was not normalized
    Mock::given(method("GET"))
        .and(path("/wiki/Bees"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let cache_dir = TempDir::new().unwrap();
    let options = options(&server, &cache_dir);

    let (fresh_json, stats) = fresh_tree(&options, None, "Bees", 1).await.unwrap();
    assert_eq!(stats.pages_visited, 1);
    assert_eq!(
        tree::decode(&fresh_json).unwrap(),
        TopicNode::with_children("bees", vec![TopicNode::new("Honey")])
    );
    // Nothing is written on the uncached path
    assert!(!cache_dir.path().join("bees-1.json").exists());

    let service = build_service(&options, None).unwrap();
    let cached = service.tree_json("Bees", 1).await.unwrap();
    assert_eq!(cached.json, fresh_json);
}
