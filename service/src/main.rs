use std::time::Duration;

use hallostories_common::database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::repository::GameRepository;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::cache::CachedGameRepository;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::persistence::memory::InMemoryGameRepository;
use crate::infrastructure::persistence::repository::PostgresGameRepository;
use crate::infrastructure::settings::{Settings, StorageKind};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    tracing::info!("configuration loaded, storage: {:?}", settings.storage);

    match settings.storage {
        StorageKind::Postgres => {
            let database = database::connect(settings.database()?).await?;
            tracing::info!("connected to database");
            serve(PostgresGameRepository::new(database), &settings).await
        }
        StorageKind::Memory => {
            tracing::warn!("in-memory storage: the game is lost on restart");
            serve(InMemoryGameRepository::new(), &settings).await
        }
    }
}

async fn serve(repository: impl GameRepository, settings: &Settings) -> anyhow::Result<()> {
    let ttl = Duration::from_secs(settings.cache_ttl_seconds);
    let repository = CachedGameRepository::new(repository, ttl);
    let state = AppStateImpl::new(repository, &settings.admin_password);

    let server_config = HttpServerConfig {
        port: settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
