//! Bearer token validation.
//!
//! Steps run in order and stop at the first failure:
//! header present, `Bearer ` prefix, store lookup, age check.

use axum::http::HeaderValue;
use tracing::{debug, error};

use super::errors::Rejection;
use super::state::AuthSettings;
use super::types::AuthenticatedUser;
use crate::db::Database;

/// Scheme prefix, matched case-sensitively.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Resolve an `Authorization` header value to a user.
///
/// Performs one read, plus one delete when the token has expired. A lookup
/// miss sleeps for `lookup_miss_delay` on the async timer before rejecting.
/// The token value is never logged.
pub async fn validate_bearer(
    db: &Database,
    header: Option<&HeaderValue>,
    now: i64,
    settings: &AuthSettings,
) -> Result<AuthenticatedUser, Rejection> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(Rejection::MissingHeader),
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(Rejection::MalformedHeader)?;

    let found = db.tokens().find_user_by_token(token).await.map_err(|e| {
        error!(error = %e, "Failed to look up token");
        Rejection::StoreError
    })?;

    let Some((user, issued_at)) = found else {
        tokio::time::sleep(settings.lookup_miss_delay).await;
        return Err(Rejection::TokenNotFound);
    };

    if settings.is_expired(issued_at, now) {
        // A failed delete means the store is unhealthy; report that over the expiry.
        db.tokens().delete(token).await.map_err(|e| {
            error!(error = %e, user_id = user.id, "Failed to delete expired token");
            Rejection::StoreError
        })?;
        debug!(user_id = user.id, "deleted expired token");
        return Err(Rejection::TokenExpired);
    }

    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issue_token;
    use crate::db::NewUser;
    use std::time::{Duration, Instant};

    const DAY: i64 = 24 * 60 * 60;
    const NOW: i64 = 1_700_000_000;

    fn fast_settings() -> AuthSettings {
        AuthSettings {
            lookup_miss_delay: Duration::from_millis(50),
            ..AuthSettings::default()
        }
    }

    async fn setup() -> (Database, i64) {
        let db = Database::open(":memory:").await.unwrap();
        let id = db
            .users()
            .create(&NewUser {
                user_type: 2,
                first_name: "Carol",
                last_name: "Danvers",
                email: "carol@example.com",
                password_hash: "$argon2id$stub",
            })
            .await
            .unwrap();
        (db, id)
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (db, _) = setup().await;
        let result = validate_bearer(&db, None, NOW, &fast_settings()).await;
        assert_eq!(result, Err(Rejection::MissingHeader));
    }

    #[tokio::test]
    async fn test_empty_header_counts_as_missing() {
        let (db, _) = setup().await;
        let value = HeaderValue::from_static("");
        let result = validate_bearer(&db, Some(&value), NOW, &fast_settings()).await;
        assert_eq!(result, Err(Rejection::MissingHeader));
    }

    #[tokio::test]
    async fn test_malformed_headers() {
        let (db, _) = setup().await;
        for raw in ["Basic abc", "bearer abc", "Bearer", "Token abc", "abc"] {
            let value = HeaderValue::from_static(raw);
            let result = validate_bearer(&db, Some(&value), NOW, &fast_settings()).await;
            assert_eq!(result, Err(Rejection::MalformedHeader), "header {:?}", raw);
        }
    }

    #[tokio::test]
    async fn test_non_ascii_header_is_malformed() {
        let (db, _) = setup().await;
        let value = HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap();
        let result = validate_bearer(&db, Some(&value), NOW, &fast_settings()).await;
        assert_eq!(result, Err(Rejection::MalformedHeader));
    }

    #[tokio::test]
    async fn test_fresh_token_resolves_to_owner() {
        let (db, id) = setup().await;
        let settings = fast_settings();
        let token = issue_token(&db, id, NOW, &settings).await.unwrap();

        let user = validate_bearer(&db, Some(&bearer(&token)), NOW + 60, &settings)
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.user_type, 2);
        assert_eq!(user.first_name, "Carol");
        assert_eq!(user.last_name, "Danvers");
        assert_eq!(user.email, "carol@example.com");
    }

    #[tokio::test]
    async fn test_unknown_token_waits_then_rejects() {
        let (db, _) = setup().await;
        let settings = fast_settings();

        let started = Instant::now();
        let result = validate_bearer(&db, Some(&bearer("no-such-token")), NOW, &settings).await;

        assert_eq!(result, Err(Rejection::TokenNotFound));
        assert!(started.elapsed() >= settings.lookup_miss_delay);
    }

    #[tokio::test]
    async fn test_empty_token_after_prefix_is_not_found() {
        let (db, _) = setup().await;
        let value = HeaderValue::from_static("Bearer ");
        let result = validate_bearer(&db, Some(&value), NOW, &fast_settings()).await;
        assert_eq!(result, Err(Rejection::TokenNotFound));
    }

    #[tokio::test]
    async fn test_expired_token_is_deleted() {
        let (db, id) = setup().await;
        let settings = fast_settings();
        let token = issue_token(&db, id, NOW, &settings).await.unwrap();
        let later = NOW + DAY + 60 * 60;

        let result = validate_bearer(&db, Some(&bearer(&token)), later, &settings).await;
        assert_eq!(result, Err(Rejection::TokenExpired));
        assert!(db.tokens().find_user_by_token(&token).await.unwrap().is_none());

        let again = validate_bearer(&db, Some(&bearer(&token)), later, &settings).await;
        assert_eq!(again, Err(Rejection::TokenNotFound));
    }

    #[tokio::test]
    async fn test_token_at_exact_limit_is_valid() {
        let (db, id) = setup().await;
        let settings = fast_settings();
        let token = issue_token(&db, id, NOW, &settings).await.unwrap();

        let result = validate_bearer(&db, Some(&bearer(&token)), NOW + DAY, &settings).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_tampered_token_is_not_found() {
        let (db, id) = setup().await;
        let settings = fast_settings();
        let token = issue_token(&db, id, NOW, &settings).await.unwrap();

        let mut tampered: Vec<char> = token.chars().collect();
        tampered[0] = if tampered[0] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        let result = validate_bearer(&db, Some(&bearer(&tampered)), NOW, &settings).await;
        assert_eq!(result, Err(Rejection::TokenNotFound));
    }

    #[tokio::test]
    async fn test_failed_expiry_delete_is_store_error() {
        let (db, id) = setup().await;
        let settings = fast_settings();
        let token = issue_token(&db, id, NOW, &settings).await.unwrap();
        sqlx::query(
            "CREATE TRIGGER block_token_delete BEFORE DELETE ON login_tokens \
             BEGIN SELECT RAISE(ABORT, 'delete blocked'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let later = NOW + DAY + 1;
        let result = validate_bearer(&db, Some(&bearer(&token)), later, &settings).await;
        assert_eq!(result, Err(Rejection::StoreError));
        assert!(db.tokens().find_user_by_token(&token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_failure_is_store_error_without_delay() {
        let (db, _) = setup().await;
        let settings = AuthSettings {
            lookup_miss_delay: Duration::from_secs(30),
            ..AuthSettings::default()
        };
        db.pool().close().await;

        let started = Instant::now();
        let result = validate_bearer(&db, Some(&bearer("anything")), NOW, &settings).await;

        assert_eq!(result, Err(Rejection::StoreError));
        assert!(started.elapsed() < settings.lookup_miss_delay);
    }
}
