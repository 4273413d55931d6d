//! API configuration

use serde::Deserialize;

/// Which adapters back the ports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

/// API configuration
///
/// Read from `APP_*` environment variables, e.g. `APP_PORT=9090` or
/// `APP_STORAGE=memory`. Missing values take the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage: StorageBackend,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/accounting".to_string(),
            storage: StorageBackend::Postgres,
            log_level: "info".to_string(),
            max_connections: 10,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// An in-memory configuration for tests and local runs
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
