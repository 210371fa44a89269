//! Token lifecycle management
//!
//! Issues, validates and revokes the bearer credentials that gate the
//! mapping API. Tokens are self-contained JWTs; the only stateful part of
//! the scheme is the revocation list, consulted after the stateless checks
//! pass. Password digesting for signup/login is part of the issuance flow.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::jwt::JwtService;
use crate::errors::{LinkvaultError, Result};
use crate::storage::{RevokedToken, Storage, User};
use crate::utils::password::{hash_password, verify_password};

/// Identity attached to a request once its token has fully validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthedUser {
    pub username: String,
    pub jti: String,
}

pub struct AuthService {
    storage: Arc<dyn Storage>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, jwt: JwtService) -> Self {
        Self { storage, jwt }
    }

    /// Register a new account and issue its first token.
    pub async fn signup(&self, username: &str, password: &str) -> Result<String> {
        if username.is_empty() || password.is_empty() {
            return Err(LinkvaultError::validation(
                "username or password not provided",
            ));
        }

        // Opportunistic pre-check for a friendlier error; the primary key
        // is what actually enforces uniqueness under concurrency.
        if self.storage.find_user(username).await?.is_some() {
            return Err(LinkvaultError::conflict(format!(
                "username already exists: {}",
                username
            )));
        }

        let record = User {
            username: username.to_string(),
            password_hash: hash_password(password),
            created_at: Utc::now(),
        };
        self.storage.insert_user(record).await?;

        info!("AuthService: signup '{}'", username);
        self.issue(username)
    }

    /// Check credentials and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        if username.is_empty() || password.is_empty() {
            return Err(LinkvaultError::validation(
                "username or password not provided",
            ));
        }

        let user = self.storage.find_user(username).await?;

        // Unknown user and wrong password are indistinguishable on purpose.
        let valid = user
            .map(|u| verify_password(password, &u.password_hash))
            .unwrap_or(false);

        if !valid {
            warn!("AuthService: failed login for '{}'", username);
            return Err(LinkvaultError::auth("invalid credentials"));
        }

        info!("AuthService: login '{}'", username);
        self.issue(username)
    }

    /// Revoke a token. Requires a fully valid token: malformed or expired
    /// tokens cannot be logged out (an expired token needs no revocation),
    /// and a second logout of the same token fails the revocation check.
    pub async fn logout(&self, token: &str) -> Result<AuthedUser> {
        let authed = self.validate(token).await?;

        self.storage
            .insert_revoked_token(RevokedToken {
                jti: authed.jti.clone(),
                created_at: Utc::now(),
            })
            .await?;

        info!("AuthService: logout '{}'", authed.username);
        Ok(authed)
    }

    /// Validate a bearer token: signature and expiry first (stateless),
    /// then the revocation list.
    pub async fn validate(&self, token: &str) -> Result<AuthedUser> {
        self.validate_at(token, Utc::now()).await
    }

    /// Same as [`validate`](Self::validate) with an explicit clock for the
    /// revocation window, so tests can simulate marker expiry.
    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthedUser> {
        let claims = self
            .jwt
            .validate_access_token(token)
            .map_err(|e| {
                debug!("AuthService: token rejected: {}", e);
                LinkvaultError::auth("invalid or expired token")
            })?;

        if self
            .storage
            .find_revoked_token(&claims.jti, now)
            .await?
            .is_some()
        {
            return Err(LinkvaultError::auth("token has been revoked"));
        }

        Ok(AuthedUser {
            username: claims.sub,
            jti: claims.jti,
        })
    }

    fn issue(&self, username: &str) -> Result<String> {
        self.jwt
            .generate_access_token(username)
            .map_err(|e| LinkvaultError::internal(format!("token generation failed: {}", e)))
    }
}
