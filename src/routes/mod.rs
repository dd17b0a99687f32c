use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::EngineSettings,
    db::{DismissalRepository, ExperimentRepository, MappingRepository},
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{DismissalLedger, RecommendationEngine},
};

pub mod dismissals;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub engine: RecommendationEngine,
    pub ledger: DismissalLedger,
}

impl AppState {
    pub fn new(
        experiments: Arc<dyn ExperimentRepository>,
        mappings: Arc<dyn MappingRepository>,
        dismissals: Arc<dyn DismissalRepository>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            engine: RecommendationEngine::new(
                experiments.clone(),
                mappings.clone(),
                dismissals.clone(),
                settings,
            ),
            ledger: DismissalLedger::new(experiments, mappings, dismissals),
        }
    }

    /// Builds state from one store that serves every repository port
    pub fn from_store<S>(store: S, settings: EngineSettings) -> Self
    where
        S: ExperimentRepository + MappingRepository + DismissalRepository + Clone + 'static,
    {
        Self::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
            settings,
        )
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/experiments/gaps",
            get(recommendations::list_experiments_with_gaps),
        )
        .route(
            "/experiments/:experiment_id/recommendations",
            get(recommendations::get_recommendations),
        )
        .route(
            "/experiments/:experiment_id/recommendations/dismissed",
            get(dismissals::get_dismissed_mappings),
        )
        .route(
            "/experiments/:experiment_id/recommendations/:mapping_id/dismiss",
            post(dismissals::dismiss_mapping).delete(dismissals::undo_dismiss),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
