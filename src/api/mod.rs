pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::RiskConfig;
use crate::errors::RiskError;
use crate::pipeline::PipelineExecutor;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<PipelineExecutor>,
}

pub fn create_app_state(config: &RiskConfig) -> Result<AppState, RiskError> {
    Ok(AppState {
        executor: Arc::new(PipelineExecutor::from_config(config)?),
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::root))
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/analyze", post(routes::analyze::analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
