use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use linkvault::api::jwt::JwtService;
use linkvault::errors::{LinkvaultError, Result};
use linkvault::services::AuthService;
use linkvault::storage::{RevokedToken, Storage, UrlMapping, User};

const TOKEN_VALIDITY: i64 = 5; // hours

// 模拟存储实现用于测试
#[derive(Default)]
struct MockStorage {
    users: Mutex<HashMap<String, User>>,
    mappings: Mutex<HashMap<String, UrlMapping>>,
    revoked: Mutex<HashMap<String, RevokedToken>>,
}

#[async_trait]
impl Storage for MockStorage {
    async fn find_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(username).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Err(LinkvaultError::conflict("username already exists"));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find_mapping_by_code(&self, code: &str) -> Result<Option<UrlMapping>> {
        Ok(self.mappings.lock().unwrap().get(code).cloned())
    }

    async fn find_mapping_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        Ok(self
            .mappings
            .lock()
            .unwrap()
            .values()
            .find(|m| m.long_url == long_url)
            .cloned())
    }

    async fn insert_mapping(&self, mapping: UrlMapping) -> Result<()> {
        self.mappings
            .lock()
            .unwrap()
            .insert(mapping.short_code.clone(), mapping);
        Ok(())
    }

    async fn insert_revoked_token(&self, token: RevokedToken) -> Result<()> {
        self.revoked
            .lock()
            .unwrap()
            .insert(token.jti.clone(), token);
        Ok(())
    }

    async fn find_revoked_token(
        &self,
        jti: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RevokedToken>> {
        let cutoff = now - Duration::hours(TOKEN_VALIDITY);
        Ok(self
            .revoked
            .lock()
            .unwrap()
            .get(jti)
            .filter(|t| t.created_at > cutoff)
            .cloned())
    }

    async fn purge_expired_tokens(&self, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = now - Duration::hours(TOKEN_VALIDITY);
        let mut revoked = self.revoked.lock().unwrap();
        let before = revoked.len();
        revoked.retain(|_, t| t.created_at > cutoff);
        Ok((before - revoked.len()) as u64)
    }

    async fn reset(&self) -> Result<()> {
        self.users.lock().unwrap().clear();
        self.mappings.lock().unwrap().clear();
        self.revoked.lock().unwrap().clear();
        Ok(())
    }

    async fn backend_name(&self) -> String {
        "mock".to_string()
    }
}

fn auth_service() -> AuthService {
    AuthService::new(
        Arc::new(MockStorage::default()),
        JwtService::new("test_secret_key_32_bytes_long!!", Duration::hours(TOKEN_VALIDITY)),
    )
}

#[tokio::test]
async fn test_signup_issues_a_valid_token() {
    let auth = auth_service();

    let token = auth.signup("alice", "secret").await.unwrap();
    let authed = auth.validate(&token).await.unwrap();
    assert_eq!(authed.username, "alice");
    assert!(!authed.jti.is_empty());
}

#[tokio::test]
async fn test_signup_rejects_missing_fields() {
    let auth = auth_service();

    assert!(matches!(
        auth.signup("", "secret").await,
        Err(LinkvaultError::Validation(_))
    ));
    assert!(matches!(
        auth.signup("alice", "").await,
        Err(LinkvaultError::Validation(_))
    ));
}

#[tokio::test]
async fn test_signup_duplicate_username_conflicts() {
    let auth = auth_service();

    auth.signup("alice", "p1").await.unwrap();
    assert!(matches!(
        auth.signup("alice", "p2").await,
        Err(LinkvaultError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_login_checks_credentials() {
    let auth = auth_service();
    auth.signup("alice", "secret").await.unwrap();

    let token = auth.login("alice", "secret").await.unwrap();
    assert_eq!(auth.validate(&token).await.unwrap().username, "alice");

    assert!(matches!(
        auth.login("alice", "wrong").await,
        Err(LinkvaultError::Auth(_))
    ));
    // Unknown user reads the same as a wrong password.
    assert!(matches!(
        auth.login("nobody", "secret").await,
        Err(LinkvaultError::Auth(_))
    ));
}

#[tokio::test]
async fn test_validate_rejects_garbage_tokens() {
    let auth = auth_service();

    assert!(matches!(
        auth.validate("not.a.token").await,
        Err(LinkvaultError::Auth(_))
    ));
    assert!(matches!(
        auth.validate("").await,
        Err(LinkvaultError::Auth(_))
    ));
}

#[tokio::test]
async fn test_validate_rejects_token_signed_with_other_secret() {
    let auth = auth_service();
    let other = JwtService::new("another_secret_key_32_bytes!!!!", Duration::hours(TOKEN_VALIDITY));

    let forged = other.generate_access_token("alice").unwrap();
    assert!(matches!(
        auth.validate(&forged).await,
        Err(LinkvaultError::Auth(_))
    ));
}

#[tokio::test]
async fn test_logout_revokes_the_token() {
    let auth = auth_service();

    let token = auth.signup("alice", "secret").await.unwrap();
    assert!(auth.validate(&token).await.is_ok());

    auth.logout(&token).await.unwrap();

    let err = auth.validate(&token).await.unwrap_err();
    assert!(matches!(err, LinkvaultError::Auth(_)));
    assert!(err.message().contains("revoked"));
}

#[tokio::test]
async fn test_logout_requires_a_valid_token() {
    let auth = auth_service();

    assert!(matches!(
        auth.logout("garbage").await,
        Err(LinkvaultError::Auth(_))
    ));
}

#[tokio::test]
async fn test_second_logout_fails_the_revocation_check() {
    let auth = auth_service();

    let token = auth.signup("alice", "secret").await.unwrap();
    auth.logout(&token).await.unwrap();

    // The token is already on the revocation list, so revoke's own
    // validation rejects it.
    assert!(matches!(
        auth.logout(&token).await,
        Err(LinkvaultError::Auth(_))
    ));
}

#[tokio::test]
async fn test_other_sessions_survive_a_logout() {
    let auth = auth_service();

    let t1 = auth.signup("alice", "secret").await.unwrap();
    let t2 = auth.login("alice", "secret").await.unwrap();

    auth.logout(&t1).await.unwrap();

    assert!(auth.validate(&t1).await.is_err());
    assert!(auth.validate(&t2).await.is_ok());
}

#[tokio::test]
async fn test_revocation_marker_expires_with_the_token_window() {
    let auth = auth_service();

    let token = auth.signup("alice", "secret").await.unwrap();
    auth.logout(&token).await.unwrap();

    let now = Utc::now();

    // Inside the validity window the marker still blocks.
    let err = auth
        .validate_at(&token, now + Duration::hours(4))
        .await
        .unwrap_err();
    assert!(err.message().contains("revoked"));

    // Once the window has elapsed the marker no longer blocks; the token
    // itself would be expired by then anyway, so nothing is lost.
    let result = auth
        .validate_at(&token, now + Duration::hours(TOKEN_VALIDITY) + Duration::minutes(1))
        .await;
    assert!(result.is_ok());
}
