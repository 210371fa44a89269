use chrono::{Duration, Utc};
use tempfile::NamedTempFile;

use linkvault::errors::LinkvaultError;
use linkvault::storage::backends::sea_orm::SeaOrmStorage;
use linkvault::storage::{RevokedToken, Storage, UrlMapping, User};

const TOKEN_VALIDITY: i64 = 5; // hours

// 基于临时 SQLite 文件的真实存储，自动跑迁移
async fn setup() -> (SeaOrmStorage, NamedTempFile) {
    let db_file = NamedTempFile::new().expect("temp file");
    let url = format!("sqlite://{}", db_file.path().display());
    let storage = SeaOrmStorage::new(&url, "sqlite", Duration::hours(TOKEN_VALIDITY))
        .await
        .expect("storage init");
    (storage, db_file)
}

fn user(username: &str) -> User {
    User {
        username: username.to_string(),
        password_hash: "0".repeat(64),
        created_at: Utc::now(),
    }
}

fn mapping(code: &str, long_url: &str) -> UrlMapping {
    UrlMapping {
        short_code: code.to_string(),
        long_url: long_url.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_user_insert_and_lookup() {
    let (storage, _db) = setup().await;

    assert!(storage.find_user("alice").await.unwrap().is_none());

    storage.insert_user(user("alice")).await.unwrap();
    let found = storage.find_user("alice").await.unwrap().unwrap();
    assert_eq!(found.username, "alice");
    assert_eq!(found.password_hash, "0".repeat(64));

    // Case-sensitive key: a different casing is a different user.
    assert!(storage.find_user("Alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_a_conflict() {
    let (storage, _db) = setup().await;

    storage.insert_user(user("alice")).await.unwrap();
    assert!(matches!(
        storage.insert_user(user("alice")).await,
        Err(LinkvaultError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_mapping_lookups_in_both_directions() {
    let (storage, _db) = setup().await;

    storage
        .insert_mapping(mapping("abc12345", "https://example.com/a"))
        .await
        .unwrap();

    let by_code = storage
        .find_mapping_by_code("abc12345")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code.long_url, "https://example.com/a");

    let by_url = storage
        .find_mapping_by_long_url("https://example.com/a")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.short_code, "abc12345");

    assert!(
        storage
            .find_mapping_by_code("missing0")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_unique_keys_on_both_mapping_columns() {
    let (storage, _db) = setup().await;

    storage
        .insert_mapping(mapping("abc12345", "https://example.com/a"))
        .await
        .unwrap();

    // Same URL under a different code: the long_url unique index trips.
    assert!(matches!(
        storage
            .insert_mapping(mapping("zzz99999", "https://example.com/a"))
            .await,
        Err(LinkvaultError::Conflict(_))
    ));

    // Same code for a different URL: the primary key trips.
    assert!(matches!(
        storage
            .insert_mapping(mapping("abc12345", "https://example.com/b"))
            .await,
        Err(LinkvaultError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_revocation_window() {
    let (storage, _db) = setup().await;
    let now = Utc::now();

    storage
        .insert_revoked_token(RevokedToken {
            jti: "jti-1".to_string(),
            created_at: now,
        })
        .await
        .unwrap();

    // Blocking inside the validity window.
    assert!(
        storage
            .find_revoked_token("jti-1", now)
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        storage
            .find_revoked_token("jti-1", now + Duration::hours(4))
            .await
            .unwrap()
            .is_some()
    );

    // No longer blocking once the window has elapsed, even before any
    // sweeper pass has removed the row.
    assert!(
        storage
            .find_revoked_token("jti-1", now + Duration::hours(TOKEN_VALIDITY) + Duration::minutes(1))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_revoking_the_same_jti_twice_is_ok() {
    let (storage, _db) = setup().await;
    let now = Utc::now();

    let marker = RevokedToken {
        jti: "jti-1".to_string(),
        created_at: now,
    };
    storage.insert_revoked_token(marker.clone()).await.unwrap();
    storage.insert_revoked_token(marker).await.unwrap();
}

#[tokio::test]
async fn test_purge_removes_only_expired_markers() {
    let (storage, _db) = setup().await;
    let now = Utc::now();

    storage
        .insert_revoked_token(RevokedToken {
            jti: "old".to_string(),
            created_at: now - Duration::hours(6),
        })
        .await
        .unwrap();
    storage
        .insert_revoked_token(RevokedToken {
            jti: "fresh".to_string(),
            created_at: now,
        })
        .await
        .unwrap();

    let purged = storage.purge_expired_tokens(now).await.unwrap();
    assert_eq!(purged, 1);

    assert!(
        storage
            .find_revoked_token("fresh", now)
            .await
            .unwrap()
            .is_some()
    );
    // The old row is physically gone, not just filtered.
    assert_eq!(storage.purge_expired_tokens(now).await.unwrap(), 0);
}

#[tokio::test]
async fn test_reset_wipes_all_record_sets() {
    let (storage, _db) = setup().await;

    storage.insert_user(user("alice")).await.unwrap();
    storage
        .insert_mapping(mapping("abc12345", "https://example.com/a"))
        .await
        .unwrap();
    storage
        .insert_revoked_token(RevokedToken {
            jti: "jti-1".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    storage.reset().await.unwrap();

    assert!(storage.find_user("alice").await.unwrap().is_none());
    assert!(
        storage
            .find_mapping_by_code("abc12345")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        storage
            .find_revoked_token("jti-1", Utc::now())
            .await
            .unwrap()
            .is_none()
    );
}
