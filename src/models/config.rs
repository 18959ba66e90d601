use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration options of the catalog admin service.
///
/// Values come from `config/default.yaml`, an optional
/// `config/{APP_ENV}.yaml` override and `APP_*` environment variables, in
/// that order of precedence.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Interface to bind the HTTP server to.
    pub address: String,
    pub port: u16,
    /// Key material for signing flash-message cookies. At least 64 bytes.
    pub secret: String,
    /// Glob pattern passed to Tera.
    pub templates_dir: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
