use super::engine::search;
use super::error::SearchError;
use super::types::{ErrorResponse, MAX_LIMIT, MAX_QUERY_CHARS, SearchParams, SearchResponse};
use crate::cache::store::MessageCache;

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

/// An HTTP error carrying a status code and a `detail` message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    fn validation(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

/// Checks the bounds the extractor cannot express.
pub fn validate_params(params: &SearchParams) -> Result<(), ApiError> {
    let query_chars = params.query.chars().count();
    if query_chars == 0 {
        return Err(ApiError::validation("query must not be empty"));
    }
    if query_chars > MAX_QUERY_CHARS {
        return Err(ApiError::validation(format!(
            "query must be at most {} characters",
            MAX_QUERY_CHARS
        )));
    }
    if !(1..=MAX_LIMIT).contains(&params.limit) {
        return Err(ApiError::validation(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }
    Ok(())
}

pub async fn handle_search(
    Extension(cache): Extension<Arc<MessageCache>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!("Rejected search parameters: {}", rejection);
        ApiError::validation(rejection.body_text())
    })?;
    validate_params(&params)?;

    tracing::info!("Search request: query='{}'", params.query);

    let page = search(&cache, &params.query, params.skip, params.limit)
        .await
        .map_err(|e| {
            tracing::error!("Search error: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(SearchResponse {
        query: params.query,
        total: page.total_matches,
        skip: params.skip,
        limit: params.limit,
        results: page.items,
    }))
}
