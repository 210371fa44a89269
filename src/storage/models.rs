use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account. Created at signup, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    /// Hex SHA-256 digest; the plaintext never reaches the store.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A short code and the URL it stands for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

/// Revocation marker for a logged-out token. Only meaningful while the
/// token it blocks could still be alive; the store ages these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokedToken {
    pub jti: String,
    pub created_at: DateTime<Utc>,
}
