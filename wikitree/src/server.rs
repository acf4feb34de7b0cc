use crate::handlers::{parse_pages, parse_topic};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use wikitree_core::{CoreError, TreeService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TreeService>,
    pub page_ceiling: usize,
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    topic: Option<String>,
    pages: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(tree_handler))
        .with_state(state)
}

pub async fn serve(bind: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn tree_handler(State(state): State<AppState>, Query(query): Query<TreeQuery>) -> Response {
    let topic = match parse_topic(query.topic.as_deref()) {
        Ok(topic) => topic,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let pages = match parse_pages(query.pages.as_deref(), state.page_ceiling) {
        Ok(pages) => pages,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    match state.service.tree_json(&topic, pages).await {
        Ok(response) => {
            info!(
                "Tree for {} ({} pages) served, cached: {}",
                topic, pages, response.from_cache
            );
            ([(header::CONTENT_TYPE, "application/json")], response.json).into_response()
        }
        Err(e) if e.is_topic_not_found() => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
        Err(CoreError::Encoding(e)) => {
            warn!("Encoding tree for {} failed: {}", topic, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Encoding failed: {}", e)).into_response()
        }
        Err(e) => {
            warn!("Crawl for {} failed: {}", topic, e);
            (StatusCode::BAD_GATEWAY, format!("Crawl failed: {}", e)).into_response()
        }
    }
}
