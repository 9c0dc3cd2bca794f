use crate::domain::repository::GameRepository;

pub mod ledger;
pub mod participation;
pub mod repository;
pub mod scoring;

/// The global application state shared between all request handlers.
pub trait AppState: Clone + Send + Sync + 'static {
    type R: GameRepository;

    fn repository(&self) -> &Self::R;

    /// Password expected in the `x-admin-password` header of admin requests
    fn admin_password(&self) -> &str;
}
