use crate::{handlers::*, AppState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/topics", get(list_topics))
        .route("/api/keywords", get(list_keywords))
        .route("/api/generate-blog", post(generate_blog))
        .route("/api/generate-multiple", post(generate_multiple))
        .route("/api/stats", get(stats))
        .route("/metrics", get(metrics))
}

pub fn build_router(state: AppState) -> Router {
    create_router().with_state(state)
}
