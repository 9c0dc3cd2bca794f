use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::domain::AppState;
use crate::domain::participation::{self, ParticipationReport};
use crate::domain::repository::GameRepository;
use crate::domain::scoring::{self, Leaderboard};
use crate::infrastructure::http::admin::AdminAccess;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetResponse {
    message: &'static str,
}

pub async fn participation_report<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<ParticipationReport>, ApiError> {
    let snapshot = state.repository().snapshot().await?;
    let report = participation::track(&snapshot.stories, &snapshot.votes);
    Ok(ApiSuccess::new(StatusCode::OK, report))
}

pub async fn results<S: AppState>(
    _: AdminAccess,
    State(state): State<S>,
) -> Result<ApiSuccess<Leaderboard>, ApiError> {
    let snapshot = state.repository().snapshot().await?;
    let leaderboard = scoring::score(&snapshot.stories, &snapshot.votes);
    Ok(ApiSuccess::new(StatusCode::OK, leaderboard))
}

pub async fn reset<S: AppState>(
    _: AdminAccess,
    State(state): State<S>,
) -> Result<ApiSuccess<ResetResponse>, ApiError> {
    state.repository().reset().await?;
    tracing::info!("game reset: all stories and votes removed");
    Ok(ApiSuccess::new(
        StatusCode::OK,
        ResetResponse {
            message: "Game reset",
        },
    ))
}
