use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hallostories_common::records::RecordError;
use serde::Serialize;

use crate::domain::ledger::VoteError;
use crate::domain::repository::{RepositoryError, SubmitVoteError};

// ApiSuccess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ApiError is a wrapper around a response that includes a status code.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    ConflictWithServerState(String),
    Unauthorized,
    NotFound(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(id) => Self::NotFound(format!("Story {} not found", id)),
            RepositoryError::Moderation(cause) => Self::ConflictWithServerState(cause.to_string()),
            RepositoryError::DatabaseError(cause) => {
                tracing::error!("{:?}", cause);
                Self::InternalServerError("Database server error".to_string())
            }
        }
    }
}

impl From<VoteError> for ApiError {
    fn from(value: VoteError) -> Self {
        tracing::debug!("vote rejected: {:?}", value);
        match value {
            VoteError::AlreadyVoted => Self::ConflictWithServerState(value.to_string()),
            VoteError::IncompleteSelection(_) => Self::UnprocessableEntity(value.to_string()),
            VoteError::StoryNotEligible => {
                Self::ConflictWithServerState("Failed to submit vote".to_string())
            }
        }
    }
}

impl From<SubmitVoteError> for ApiError {
    fn from(value: SubmitVoteError) -> Self {
        match value {
            SubmitVoteError::Rejected(cause) => cause.into(),
            SubmitVoteError::Repository(cause) => cause.into(),
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(value: RecordError) -> Self {
        Self::UnprocessableEntity(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::UnprocessableEntity(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        let (status, message) = match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ConflictWithServerState(message) => (StatusCode::CONFLICT, message),
            Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

// Generic response structure shared by all API responses.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub status_code: u16,
    pub data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}
