//! Runtime settings for the `tasktrack` binary.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `tasktrack.toml` in the working directory, then `TASKTRACK__*`
//! environment variables (for example `TASKTRACK__DATABASE__PASSWORD`).

use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use tasktrack_db::{DbConfig, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    /// Full connection URL; when set, the individual parts are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field(
                "url",
                &self.url.as_deref().map(|url| match DbConfig::from_url(url) {
                    Ok(config) => config.redacted_url(),
                    Err(_) => "<invalid url>".to_string(),
                }),
            )
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Load settings from defaults, `tasktrack.toml` and the environment.
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("tasktrack").required(false))
            .add_source(Environment::with_prefix("TASKTRACK").separator("__"));

        Self::from_builder(builder)
    }

    /// Builder preloaded with the default values.
    pub fn defaults() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "test_tasks")?
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_secs", 5)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> std::result::Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Connection settings for the repository. Fails with a connection
    /// error when `database.url` is set but does not parse.
    pub fn db_config(&self) -> Result<DbConfig> {
        let db = &self.database;
        let config = match db.url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => DbConfig::from_url(url)?,
            None => DbConfig::from_parts(&db.host, db.port, &db.user, &db.password, &db.name),
        };

        Ok(config
            .with_max_connections(db.max_connections)
            .with_acquire_timeout(Duration::from_secs(db.acquire_timeout_secs)))
    }
}
