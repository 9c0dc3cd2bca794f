use axum::extract::{Path, State};
use axum::http::StatusCode;
use hallostories_common::records::NewStoryRecord;
use hallostories_common::story::{Moderation, NewStory, Story, StoryId};

use crate::domain::AppState;
use crate::domain::repository::GameRepository;
use crate::infrastructure::http::admin::AdminAccess;
use crate::infrastructure::http::api::{ApiError, ApiSuccess};
use crate::infrastructure::http::handlers::stories::dto::{
    ManyStoriesResponse, ModerationOverviewResponse,
};
use crate::infrastructure::http::json::JsonBody;

mod dto;

pub async fn list_stories<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<ManyStoriesResponse>, ApiError> {
    let stories = state.repository().list_approved_stories().await?;
    Ok(ApiSuccess::new(StatusCode::OK, ManyStoriesResponse::from(stories)))
}

pub async fn create_story<S: AppState>(
    State(state): State<S>,
    JsonBody(body): JsonBody<NewStoryRecord>,
) -> Result<ApiSuccess<Story>, ApiError> {
    let story = NewStory::try_from(body)?;
    let story = state.repository().create_story(story).await?;
    tracing::info!("story {} submitted by {}, awaiting moderation", story.id, story.author);
    Ok(ApiSuccess::new(StatusCode::CREATED, story))
}

pub async fn moderation_overview<S: AppState>(
    _: AdminAccess,
    State(state): State<S>,
) -> Result<ApiSuccess<ModerationOverviewResponse>, ApiError> {
    let stories = state.repository().list_stories().await?;
    Ok(ApiSuccess::new(StatusCode::OK, ModerationOverviewResponse::from(stories)))
}

pub async fn approve_story<S: AppState>(
    _: AdminAccess,
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<Story>, ApiError> {
    moderate(state, id, Moderation::Approve).await
}

pub async fn reject_story<S: AppState>(
    _: AdminAccess,
    Path(id): Path<String>,
    State(state): State<S>,
) -> Result<ApiSuccess<Story>, ApiError> {
    moderate(state, id, Moderation::Reject).await
}

async fn moderate<S: AppState>(
    state: S,
    id: String,
    decision: Moderation,
) -> Result<ApiSuccess<Story>, ApiError> {
    let story = state
        .repository()
        .moderate_story(StoryId::from(id), decision)
        .await?;
    Ok(ApiSuccess::new(StatusCode::OK, story))
}
