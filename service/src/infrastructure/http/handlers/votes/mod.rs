use axum::extract::State;
use axum::http::StatusCode;
use hallostories_common::ParticipantName;
use hallostories_common::records::{RecordError, VoteRecord};
use hallostories_common::vote::Vote;

use crate::domain::AppState;
use crate::domain::ledger::VoteCandidate;
use crate::domain::participation::{self, VoterProgress};
use crate::domain::repository::GameRepository;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::votes::dto::{ManyVotesResponse, ProgressParams};
use crate::infrastructure::http::json::JsonBody;
use crate::infrastructure::http::querystring::QueryString;

mod dto;

pub async fn list_votes<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<ManyVotesResponse>, ApiError> {
    let votes = state.repository().list_votes().await?;
    Ok(ApiSuccess::new(StatusCode::OK, ManyVotesResponse::from(votes)))
}

pub async fn submit_vote<S: AppState>(
    State(state): State<S>,
    JsonBody(body): JsonBody<VoteRecord>,
) -> Result<ApiSuccess<Vote>, ApiError> {
    let candidate = VoteCandidate {
        voter: body.voter()?,
        guessed_author: body.guessed_author()?,
        guessed_real: body.guessed_real,
        story_id: body.story_id,
    };

    let vote = state.repository().submit_vote(candidate).await?;
    tracing::debug!("{} voted on story {}", vote.voter, vote.story_id);
    Ok(ApiSuccess::new(StatusCode::CREATED, vote))
}

pub async fn voter_progress<S: AppState>(
    QueryString(params): QueryString<ProgressParams>,
    State(state): State<S>,
) -> Result<ApiSuccess<VoterProgress>, ApiError> {
    let voter = ParticipantName::try_new(params.voter).map_err(|err| RecordError::InvalidField {
        field: "voter",
        message: err.to_string(),
    })?;

    let snapshot = state.repository().snapshot().await?;
    let progress = participation::progress(&voter, &snapshot.stories, &snapshot.votes);
    Ok(ApiSuccess::new(StatusCode::OK, progress))
}
