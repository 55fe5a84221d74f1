use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    models::{RecommendationsQuery, RecommendationsResponse},
    services::AppState,
};

pub(crate) async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(learner_id): Path<i64>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    query
        .validate()
        .map_err(|err| ApiError::bad_request(format!("Invalid query: {}", err)))?;

    let n = query
        .n
        .unwrap_or(state.engine.settings().default_count);

    let items = state
        .engine
        .get_recommendations(learner_id, n)
        .await
        .inspect_err(|err| {
            tracing::warn!("Recommendations failed for learner={}: {:#}", learner_id, err)
        })?;

    Ok(Json(RecommendationsResponse { items }))
}

#[derive(Debug)]
pub(crate) enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(message)).into_response()
    }
}
