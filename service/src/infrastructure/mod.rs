use std::sync::Arc;

use crate::domain::AppState;
use crate::domain::repository::GameRepository;

pub mod cache;
pub mod http;
pub mod persistence;
pub mod settings;

#[derive(Clone)]
pub struct AppStateImpl<R> {
    repository: R,
    admin_password: Arc<str>,
}

impl<R: GameRepository> AppStateImpl<R> {
    pub fn new(repository: R, admin_password: &str) -> Self {
        Self {
            repository,
            admin_password: Arc::from(admin_password),
        }
    }
}

impl<R: GameRepository> AppState for AppStateImpl<R> {
    type R = R;

    fn repository(&self) -> &Self::R {
        &self.repository
    }

    fn admin_password(&self) -> &str {
        &self.admin_password
    }
}
