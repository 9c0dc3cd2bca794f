use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::AppState;
use crate::infrastructure::http::api::ApiError;

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Proof that the request carried the configured admin password.
/// Handlers that take it as an argument are admin-only.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl<S: AppState> FromRequestParts<S> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let password = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok());

        match password {
            Some(password) if password == state.admin_password() => Ok(AdminAccess),
            _ => {
                tracing::warn!("rejected admin request to {}", parts.uri.path());
                Err(ApiError::Unauthorized)
            }
        }
    }
}
