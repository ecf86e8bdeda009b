#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use hallpass::auth::AuthSettings;
use hallpass::db::{Database, NewUser};
use hallpass::password::hash_password;
use hallpass::{ServerConfig, create_app};
use std::time::Duration;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery";

/// Short enough to keep the suite fast, long enough to measure.
pub const TEST_MISS_DELAY: Duration = Duration::from_millis(100);

pub async fn create_test_app() -> (Router, Database) {
    create_test_app_with(AuthSettings {
        lookup_miss_delay: TEST_MISS_DELAY,
        ..AuthSettings::default()
    })
    .await
}

pub async fn create_test_app_with(auth: AuthSettings) -> (Router, Database) {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        auth,
    };
    (create_app(&config), db)
}

/// Insert a user with the shared test password. Returns the user id.
pub async fn create_user(db: &Database, email: &str, first_name: &str) -> i64 {
    let hash = hash_password(PASSWORD).expect("Failed to hash password");
    db.users()
        .create(&NewUser {
            user_type: 1,
            first_name,
            last_name: "Tester",
            email,
            password_hash: &hash,
        })
        .await
        .expect("Failed to create user")
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    let body = serde_json::json!({ "username": email, "password": password });
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Log in with the shared test password and return the bearer token.
pub async fn login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(login_request(email, PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["token"]
        .as_str()
        .expect("login response has no token")
        .to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Push every token issued to `user_id` further into the past.
pub async fn age_tokens(db: &Database, user_id: i64, seconds: i64) {
    sqlx::query("UPDATE login_tokens SET added_at = added_at - ? WHERE user_id = ?")
        .bind(seconds)
        .bind(user_id)
        .execute(db.pool())
        .await
        .expect("Failed to age tokens");
}

pub async fn token_count(db: &Database, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM login_tokens WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(db.pool())
        .await
        .expect("Failed to count tokens")
}
