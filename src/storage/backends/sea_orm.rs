use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter,
};
use tracing::{debug, info, warn};

use crate::errors::{LinkvaultError, Result};
use crate::storage::{RevokedToken, Storage, UrlMapping, User};

use migration::{Migrator, MigratorTrait, entities::revoked_token, entities::url_mapping, entities::user};

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// Age beyond which a revocation marker stops counting. Mirrors the
    /// token validity window: a marker only needs to outlive the token it
    /// blocks.
    revoked_ttl: Duration,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str, revoked_ttl: Duration) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkvaultError::config("database URL not set".to_string()));
        }

        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            revoked_ttl,
        };

        storage.run_migrations().await?;

        warn!("{} storage initialized.", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    /// 连接 SQLite 数据库（带自动创建和性能优化）
    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| LinkvaultError::config(format!("invalid SQLite URL: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            LinkvaultError::database_connection(format!("cannot open SQLite database: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 连接通用数据库（MySQL/PostgreSQL）
    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            LinkvaultError::database_connection(format!(
                "cannot connect to {} database: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| LinkvaultError::database_operation(format!("migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    fn model_to_user(model: user::Model) -> User {
        User {
            username: model.username,
            password_hash: model.password_hash,
            created_at: model.created_at,
        }
    }

    fn model_to_mapping(model: url_mapping::Model) -> UrlMapping {
        UrlMapping {
            short_code: model.short_code,
            long_url: model.long_url,
            created_at: model.created_at,
        }
    }

    fn model_to_revoked(model: revoked_token::Model) -> RevokedToken {
        RevokedToken {
            jti: model.jti,
            created_at: model.created_at,
        }
    }

    /// 判断是否是唯一约束冲突错误
    fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
        use sea_orm::RuntimeErr;
        use sea_orm::sqlx::Error;

        let sqlx_err = match err {
            sea_orm::DbErr::Exec(RuntimeErr::SqlxError(e))
            | sea_orm::DbErr::Query(RuntimeErr::SqlxError(e)) => e,
            _ => return false,
        };

        match &**sqlx_err {
            Error::Database(db_err) => {
                let code = db_err.code();
                // SQLite: SQLITE_CONSTRAINT_PRIMARYKEY (1555) / UNIQUE (2067)
                // MySQL: ER_DUP_ENTRY (1062)
                // PostgreSQL: unique_violation (23505)
                code.as_ref()
                    .map(|c| c == "1555" || c == "2067" || c == "1062" || c == "23505")
                    .unwrap_or(false)
            }
            _ => false,
        }
    }

    fn revocation_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.revoked_ttl
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let model = user::Entity::find_by_id(username)
            .one(&self.db)
            .await
            .map_err(|e| LinkvaultError::database_operation(format!("user lookup failed: {}", e)))?;

        Ok(model.map(Self::model_to_user))
    }

    async fn insert_user(&self, record: User) -> Result<()> {
        let active = user::ActiveModel {
            username: Set(record.username.clone()),
            password_hash: Set(record.password_hash),
            created_at: Set(record.created_at),
        };

        match user::Entity::insert(active).exec(&self.db).await {
            Ok(_) => {
                info!("User created: {}", record.username);
                Ok(())
            }
            Err(e) if Self::is_unique_violation(&e) => Err(LinkvaultError::conflict(format!(
                "username already exists: {}",
                record.username
            ))),
            Err(e) => Err(LinkvaultError::database_operation(format!(
                "user insert failed: {}",
                e
            ))),
        }
    }

    async fn find_mapping_by_code(&self, code: &str) -> Result<Option<UrlMapping>> {
        let model = url_mapping::Entity::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkvaultError::database_operation(format!("mapping lookup failed: {}", e))
            })?;

        Ok(model.map(Self::model_to_mapping))
    }

    async fn find_mapping_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        let model = url_mapping::Entity::find()
            .filter(url_mapping::Column::LongUrl.eq(long_url))
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkvaultError::database_operation(format!("mapping lookup failed: {}", e))
            })?;

        Ok(model.map(Self::model_to_mapping))
    }

    async fn insert_mapping(&self, mapping: UrlMapping) -> Result<()> {
        let active = url_mapping::ActiveModel {
            short_code: Set(mapping.short_code.clone()),
            long_url: Set(mapping.long_url.clone()),
            created_at: Set(mapping.created_at),
        };

        match url_mapping::Entity::insert(active).exec(&self.db).await {
            Ok(_) => {
                info!("Mapping created: {} -> {}", mapping.short_code, mapping.long_url);
                Ok(())
            }
            Err(e) if Self::is_unique_violation(&e) => Err(LinkvaultError::conflict(format!(
                "mapping already exists for code '{}' or this URL",
                mapping.short_code
            ))),
            Err(e) => Err(LinkvaultError::database_operation(format!(
                "mapping insert failed: {}",
                e
            ))),
        }
    }

    async fn insert_revoked_token(&self, token: RevokedToken) -> Result<()> {
        let active = revoked_token::ActiveModel {
            jti: Set(token.jti.clone()),
            created_at: Set(token.created_at),
        };

        match revoked_token::Entity::insert(active).exec(&self.db).await {
            Ok(_) => {
                debug!("Token revoked: {}", token.jti);
                Ok(())
            }
            // 重复注销同一 jti 视为已完成
            Err(e) if Self::is_unique_violation(&e) => Ok(()),
            Err(e) => Err(LinkvaultError::database_operation(format!(
                "revocation insert failed: {}",
                e
            ))),
        }
    }

    async fn find_revoked_token(
        &self,
        jti: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RevokedToken>> {
        let model = revoked_token::Entity::find_by_id(jti)
            .filter(revoked_token::Column::CreatedAt.gt(self.revocation_cutoff(now)))
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkvaultError::database_operation(format!("revocation lookup failed: {}", e))
            })?;

        Ok(model.map(Self::model_to_revoked))
    }

    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = revoked_token::Entity::delete_many()
            .filter(revoked_token::Column::CreatedAt.lte(self.revocation_cutoff(now)))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkvaultError::database_operation(format!("revocation purge failed: {}", e))
            })?;

        Ok(result.rows_affected)
    }

    async fn reset(&self) -> Result<()> {
        url_mapping::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| LinkvaultError::database_operation(format!("reset failed: {}", e)))?;
        revoked_token::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| LinkvaultError::database_operation(format!("reset failed: {}", e)))?;
        user::Entity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| LinkvaultError::database_operation(format!("reset failed: {}", e)))?;

        warn!("Storage reset: all records dropped");
        Ok(())
    }

    async fn backend_name(&self) -> String {
        self.backend_name.clone()
    }
}
