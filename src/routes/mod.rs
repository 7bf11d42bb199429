pub mod analysis;
pub mod pages;

use crate::services::{AnalysisService, ResponseAssembler};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Uploads above this size are rejected before reaching the handler.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
    pub assembler: Arc<ResponseAssembler>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/prompts", get(pages::prompts))
        .route("/upload_and_query", post(analysis::upload_and_query))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
