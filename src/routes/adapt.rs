use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::adaptive::{
    AdaptationDecision, AdaptiveConfig, DifficultyLevel, PerformanceSnapshot, ReplayReport,
};
use crate::response::AppError;
use crate::state::AppState;

const MAX_REPLAY_ATTEMPTS: usize = 1_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplayBody {
    exercise_type: String,
    start_difficulty: DifficultyLevel,
    performances: Vec<f64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(adapt))
        .route("/replay", post(replay))
        .route("/config", get(config))
}

async fn adapt(
    State(state): State<AppState>,
    payload: Result<Json<PerformanceSnapshot>, JsonRejection>,
) -> Result<Json<AdaptationDecision>, AppError> {
    let Json(snapshot) = payload?;
    let decision = state.adaptation().decide(&snapshot).await?;
    Ok(Json(decision))
}

async fn replay(
    State(state): State<AppState>,
    payload: Result<Json<ReplayBody>, JsonRejection>,
) -> Result<Json<ReplayReport>, AppError> {
    let Json(body) = payload?;
    if body.performances.len() > MAX_REPLAY_ATTEMPTS {
        return Err(AppError::validation(
            "performances",
            format!("at most {MAX_REPLAY_ATTEMPTS} attempts per replay"),
        ));
    }

    let report = state.adaptation().replay(
        &body.exercise_type,
        body.start_difficulty,
        &body.performances,
    )?;
    Ok(Json(report))
}

async fn config(State(state): State<AppState>) -> Json<AdaptiveConfig> {
    Json(state.adaptation().engine().config().clone())
}
