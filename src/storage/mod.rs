use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::errors::{LinkvaultError, Result};

pub mod backends;
pub mod models;

pub use models::{RevokedToken, UrlMapping, User};

/// Persistent store behind both core subsystems: three independent record
/// sets (users, url mappings, revoked-token markers) with no enforced
/// cross-references. Single-record reads and writes are atomic; callers get
/// no multi-record transaction, and uniqueness races surface as
/// [`LinkvaultError::Conflict`] from the insert operations.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn find_user(&self, username: &str) -> Result<Option<User>>;

    /// Insert a new user. `Conflict` if the username is already taken.
    async fn insert_user(&self, user: User) -> Result<()>;

    async fn find_mapping_by_code(&self, code: &str) -> Result<Option<UrlMapping>>;

    async fn find_mapping_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>>;

    /// Insert a new mapping. `Conflict` if the short code or the long URL
    /// is already present (unique key on either).
    async fn insert_mapping(&self, mapping: UrlMapping) -> Result<()>;

    /// Record a jti as revoked. Revoking the same jti twice is not an error.
    async fn insert_revoked_token(&self, token: RevokedToken) -> Result<()>;

    /// Look up a revocation marker that is still inside its validity window
    /// at `now`. Markers older than the window never block validation, even
    /// if the sweeper has not physically removed them yet.
    async fn find_revoked_token(&self, jti: &str, now: DateTime<Utc>)
    -> Result<Option<RevokedToken>>;

    /// Physically delete revocation markers whose window has elapsed at
    /// `now`. Returns the number of rows removed.
    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<u64>;

    /// Administrative full wipe of all three record sets.
    async fn reset(&self) -> Result<()>;

    async fn backend_name(&self) -> String;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &AppConfig) -> Result<Arc<dyn Storage>> {
        let backend = config.database.backend.as_str();

        match backend {
            "sqlite" | "mysql" | "postgres" | "mariadb" => {
                let storage = backends::sea_orm::SeaOrmStorage::new(
                    &config.database.url,
                    backend,
                    config.token_validity(),
                )
                .await?;
                Ok(Arc::new(storage) as Arc<dyn Storage>)
            }
            _ => Err(LinkvaultError::config(format!(
                "Unknown storage backend: {}. Supported: sqlite, mysql, postgres, mariadb",
                backend
            ))),
        }
    }
}
