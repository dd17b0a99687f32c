use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult, middleware::UserId, models::DismissedMappingsResponse, routes::AppState,
};

/// Hide a mapping for one experiment
pub async fn dismiss_mapping(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path((experiment_id, mapping_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state
        .ledger
        .dismiss(user_id, experiment_id, mapping_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bring a dismissed mapping back
pub async fn undo_dismiss(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path((experiment_id, mapping_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    state
        .ledger
        .undo_dismiss(user_id, experiment_id, mapping_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_dismissed_mappings(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(experiment_id): Path<Uuid>,
) -> AppResult<Json<DismissedMappingsResponse>> {
    let mapping_ids = state
        .ledger
        .list_dismissed(user_id, experiment_id)
        .await?;

    Ok(Json(DismissedMappingsResponse {
        experiment_id,
        mapping_ids,
    }))
}
