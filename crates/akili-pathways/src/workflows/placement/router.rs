use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::directory::SchoolDirectory;
use super::domain::{
    PathwayCode, PathwayFitResult, RecommendationMetadata, RecommendationSlot, SchoolCluster,
    StudentProfile,
};
use super::engine::PlacementEngine;
use super::grid::SelectionGrid;
use super::quota::{quota_chance, TrackType};
use super::safety::calculate_safety_score;
use crate::workflows::assessment::Stanine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub profile: StudentProfile,
    pub pathway_fit: PathwayFitResult,
}

/// Recommendation payload with the list already laid out on the selection grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationSlot>,
    pub metadata: RecommendationMetadata,
    pub grid: SelectionGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyScoreRequest {
    pub stanine: Stanine,
    pub cluster: SchoolCluster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaRequest {
    pub profile: StudentProfile,
    pub track: TrackType,
}

/// Router builder exposing the placement endpoints.
pub fn placement_router<D>(engine: Arc<PlacementEngine<D>>) -> Router
where
    D: SchoolDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/placement/recommendations",
            post(recommendations_handler::<D>),
        )
        .route(
            "/api/v1/placement/combinations/:pathway",
            get(combinations_handler::<D>),
        )
        .route("/api/v1/placement/safety-score", post(safety_score_handler))
        .route("/api/v1/placement/quota", post(quota_handler))
        .with_state(engine)
}

pub(crate) async fn recommendations_handler<D>(
    State(engine): State<Arc<PlacementEngine<D>>>,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response
where
    D: SchoolDirectory + 'static,
{
    match engine.recommend_schools(&request.profile, &request.pathway_fit) {
        Ok(set) => {
            let grid = SelectionGrid::from_recommendations(&set);
            let body = RecommendationResponse {
                recommendations: set.recommendations,
                metadata: set.metadata,
                grid,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn combinations_handler<D>(
    State(engine): State<Arc<PlacementEngine<D>>>,
    Path(pathway): Path<String>,
) -> Response
where
    D: SchoolDirectory + 'static,
{
    let Some(code) = PathwayCode::from_code(&pathway) else {
        let payload = json!({
            "error": format!("unknown pathway '{pathway}'"),
        });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };

    match engine.top_combinations(code) {
        Ok(combinations) => (StatusCode::OK, axum::Json(combinations)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn safety_score_handler(
    axum::Json(request): axum::Json<SafetyScoreRequest>,
) -> Response {
    let safety_score = calculate_safety_score(request.stanine, &request.cluster);
    let payload = json!({
        "stanine": request.stanine,
        "cluster": request.cluster,
        "safety_score": safety_score,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn quota_handler(axum::Json(request): axum::Json<QuotaRequest>) -> Response {
    let chance = quota_chance(&request.profile, &request.track);
    (StatusCode::OK, axum::Json(chance)).into_response()
}
