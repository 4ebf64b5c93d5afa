//! REST API endpoints for the stats service
//!
//! Both pipelines run synchronously inside the request: the response is sent
//! once every fanned-out task has finished.

use draft_stats::{AdpPipeline, PipelineConfig, Score, Scores, ScoringPipeline};
use draft_store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Reply};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Pipelines shared by every request
#[derive(Clone)]
pub struct ApiState {
    pub adp: Arc<AdpPipeline>,
    pub scoring: Arc<ScoringPipeline>,
}

impl ApiState {
    pub fn new(store: Arc<dyn DocumentStore>, config: PipelineConfig) -> Self {
        Self {
            adp: Arc::new(AdpPipeline::new(store.clone(), config.clone())),
            scoring: Arc::new(ScoringPipeline::new(store, config)),
        }
    }
}

/// Body of `POST /scoreDraftTokens`
#[derive(Debug, Deserialize)]
pub struct ScoreDraftTokensRequest {
    #[serde(default)]
    pub scores: Vec<Score>,
    #[serde(rename = "gameWeek", default)]
    pub game_week: String,
}

/// Success response carrying the run report
#[derive(Debug, Serialize)]
pub struct RunResponse<T> {
    pub status: String,
    pub message: String,
    pub details: T,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

fn error_reply(status: StatusCode, code: &str, message: String) -> warp::reply::Response {
    let body = ErrorResponse {
        error: ErrorDetail { code: code.to_string(), message, details: None },
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

fn ok_reply<T: Serialize>(message: &str, details: T) -> warp::reply::Response {
    warp::reply::json(&RunResponse { status: "ok".to_string(), message: message.to_string(), details })
        .into_response()
}

/// Recalculate ADP across all locked leagues
pub async fn calculate_adp(state: ApiState) -> Result<warp::reply::Response, warp::Rejection> {
    match state.adp.run().await {
        Ok(report) => Ok(ok_reply("Completed Updated ADP", report)),
        Err(e) => {
            error!("ADP calculation failed: {}", e);
            Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "ADP_CALCULATION_FAILED", e.to_string()))
        }
    }
}

/// Score every drafted card for the requested game week
pub async fn score_draft_tokens(body: Bytes, state: ApiState) -> Result<warp::reply::Response, warp::Rejection> {
    let request: ScoreDraftTokensRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                format!("Error decoding request body: {e}"),
            ));
        }
    };

    if request.game_week.trim().is_empty() {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "INVALID_REQUEST", "gameWeek is required".to_string()));
    }

    info!("Scoring draft tokens for week {} with {} team scores", request.game_week, request.scores.len());
    let scores = Scores::new(request.scores);
    match state.scoring.score_draft_tokens(&request.game_week, &scores).await {
        Ok(report) => Ok(ok_reply("Finished scoring draft tokens", report)),
        Err(e) => {
            error!("Scoring draft tokens failed: {}", e);
            Ok(error_reply(StatusCode::INTERNAL_SERVER_ERROR, "SCORING_FAILED", e.to_string()))
        }
    }
}

/// Create all routes
pub fn create_routes(state: ApiState) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let root = warp::path::end().and(warp::get()).map(|| "Hello World");

    // Health check endpoint
    let health = warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    let adp = warp::path("calculateADP")
        .and(warp::path::end())
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(calculate_adp);

    let scoring = warp::path("scoreDraftTokens")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(state_filter)
        .and_then(score_draft_tokens);

    root.or(health)
        .or(adp)
        .or(scoring)
        .with(warp::trace::request())
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST", "OPTIONS"]),
        )
}
