use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use diet_common::api::{HealthResponse, RecommendationRequest, RecommendationResponse};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;
use crate::model::UserProfile;
use crate::pipeline::Recommender;

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

pub fn router(recommender: Arc<Recommender>) -> Router {
    Router::new()
        .route("/", post(recommend))
        .route("/recommendations", post(recommend))
        .route("/health", get(health))
        .with_state(AppState { recommender })
        .layer(TraceLayer::new_for_http())
}

/// POST / and POST /recommendations
async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let profile = UserProfile::try_from(request)?;
    info!(
        meal = %profile.meal_type,
        goal = ?profile.goal,
        activity = ?profile.activity,
        "recommendation requested"
    );

    // The pipeline is CPU-bound.
    let recommender = Arc::clone(&state.recommender);
    let meals = tokio::task::spawn_blocking(move || recommender.recommend(&profile))
        .await
        .map_err(|e| AppError::Internal(format!("recommendation task failed: {e}")))??;

    Ok(Json(RecommendationResponse::from_ranked(meals)))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let dataset = state.recommender.dataset();
    Json(HealthResponse {
        status: "ok".to_string(),
        recipes: dataset.len(),
        dataset_sha256: dataset.fingerprint().to_string(),
        category_table_version: state.recommender.categories().version,
    })
}
