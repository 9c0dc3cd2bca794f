use std::env;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use hallostories_common::database::DatabaseSettings;
use serde::Deserialize;

/// Where the game keeps its stories and votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_port: u16,
    pub admin_password: String,
    pub storage: StorageKind,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    pub database: Option<DatabaseSettings>,
}

fn default_cache_ttl() -> u64 {
    30
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");

        let s = Config::builder()
            .add_source(File::with_name("./config/default"))
            .add_source(File::with_name(&format!("./config/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("app").separator("__"))
            .build()?;

        let settings: Settings = s.try_deserialize().with_context(|| "failed to read config")?;
        if settings.admin_password.trim().is_empty() {
            anyhow::bail!("admin_password must not be empty");
        }
        Ok(settings)
    }

    pub fn database(&self) -> anyhow::Result<&DatabaseSettings> {
        self.database
            .as_ref()
            .context("storage is postgres but no database section is configured")
    }
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
