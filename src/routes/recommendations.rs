use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::{RequestId, UserId},
    models::{ExperimentsWithGapsResponse, RecommendationsResponse},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct GapListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Ranked recommendations for one experiment
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    UserId(user_id): UserId,
    Path(experiment_id): Path<Uuid>,
) -> AppResult<Json<RecommendationsResponse>> {
    tracing::info!(
        request_id = %request_id,
        %experiment_id,
        "Processing recommendations request"
    );

    let response = state
        .engine
        .get_recommendations(user_id, experiment_id)
        .await?;

    Ok(Json(response))
}

/// Paginated backlog of experiments that still have active gaps
pub async fn list_experiments_with_gaps(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<GapListQuery>,
) -> AppResult<Json<ExperimentsWithGapsResponse>> {
    let response = state
        .engine
        .list_experiments_with_gaps(user_id, query.page, query.page_size)
        .await?;

    Ok(Json(response))
}
