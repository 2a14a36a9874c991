//! HTTP Server Wiring
//!
//! Builds the Axum router: service info, health check, and the search endpoint.

use crate::cache::store::MessageCache;
use crate::search::handlers::handle_search;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const API_V1_PREFIX: &str = "/api/v1";

/// Name and version reported by the info and health endpoints.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub cached_messages: usize,
    pub total_messages: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

pub fn build_router(cache: Arc<MessageCache>, info: AppInfo) -> Router {
    let api = Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search).post(handle_search));

    Router::new()
        .route("/", get(handle_root))
        .nest(API_V1_PREFIX, api)
        .layer(Extension(cache))
        .layer(Extension(Arc::new(info)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn handle_root(Extension(info): Extension<Arc<AppInfo>>) -> Json<RootResponse> {
    Json(RootResponse {
        name: info.name.clone(),
        version: info.version.clone(),
        status: "running".to_string(),
    })
}

async fn handle_health(
    Extension(info): Extension<Arc<AppInfo>>,
    Extension(cache): Extension<Arc<MessageCache>>,
) -> (StatusCode, Json<HealthCheckResponse>) {
    let stats = cache.stats().await;
    tracing::debug!("Health check requested ({} cached)", stats.cached_messages);

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            version: info.version.clone(),
            cached_messages: stats.cached_messages,
            total_messages: stats.total_messages,
            last_updated: stats.last_updated,
        }),
    )
}
