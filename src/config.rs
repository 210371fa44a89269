//! Process configuration
//!
//! Everything is supplied through the environment (optionally via `.env`)
//! at process start and stays immutable for the process lifetime. Values
//! are read once into an [`AppConfig`] and injected into components at
//! construction; nothing reads the environment after startup.

use serde::Deserialize;

use crate::errors::{LinkvaultError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub features: FeatureConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlite | mysql | postgres
    pub backend: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Empty means "generate a random one at startup"
    /// (tokens then do not survive a restart).
    pub jwt_secret: String,
    /// Token validity window in seconds; also bounds how long a revocation
    /// record is kept.
    pub token_validity_seconds: u64,
    /// How often the revocation sweeper runs.
    pub cleaner_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    /// Base URL prepended to short codes in responses.
    pub public_base_url: String,
    /// Compatibility switch for the legacy encode behavior that returns an
    /// existing mapping whose code equals the last path segment of the
    /// submitted URL. Off by default; see DESIGN.md.
    pub compat_alias_probe: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "plain" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Keys use the `LINKVAULT_` prefix with `__` as the section separator,
    /// e.g. `LINKVAULT_DATABASE__URL`, `LINKVAULT_AUTH__JWT_SECRET`.
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .set_default("server.host", "127.0.0.1")
            .and_then(|b| b.set_default("server.port", 8080_i64))
            .and_then(|b| b.set_default("database.backend", "sqlite"))
            .and_then(|b| b.set_default("database.url", "sqlite://linkvault.db"))
            .and_then(|b| b.set_default("auth.jwt_secret", ""))
            .and_then(|b| b.set_default("auth.token_validity_seconds", 18_000_i64))
            .and_then(|b| b.set_default("auth.cleaner_interval_seconds", 300_i64))
            .and_then(|b| b.set_default("features.public_base_url", "https://short.est"))
            .and_then(|b| b.set_default("features.compat_alias_probe", false))
            .and_then(|b| b.set_default("logging.level", "info"))
            .and_then(|b| b.set_default("logging.format", "plain"))
            .map_err(|e| LinkvaultError::config(e.to_string()))?
            .add_source(
                config::Environment::with_prefix("LINKVAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| LinkvaultError::config(e.to_string()))?;

        cfg.try_deserialize()
            .map_err(|e| LinkvaultError::config(e.to_string()))
    }

    pub fn token_validity(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.auth.token_validity_seconds as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load().expect("defaults should load");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.auth.token_validity_seconds, 18_000);
        assert_eq!(config.features.public_base_url, "https://short.est");
        assert!(!config.features.compat_alias_probe);
    }

    #[test]
    fn test_token_validity_duration() {
        let config = AppConfig::load().expect("defaults should load");
        assert_eq!(config.token_validity(), chrono::Duration::hours(5));
    }
}
