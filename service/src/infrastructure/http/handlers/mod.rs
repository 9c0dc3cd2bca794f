use axum::http::StatusCode;

pub mod game;
pub mod stories;
pub mod votes;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
