//! Login and session endpoints.
//!
//! - POST `/login` - Check credentials and return the current bearer token
//! - GET `/me` - Profile of the token's owner (requires a bearer token)

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{ApiError, ResultExt};
use crate::auth::{Auth, AuthSettings, AuthenticatedUser, issue_token, unix_now};
use crate::db::Database;
use crate::impl_has_auth_backend;
use crate::password::verify_password;

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub auth: Arc<AuthSettings>,
}

impl_has_auth_backend!(AuthState);

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    /// The account email.
    username: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    status: &'static str,
    message: &'static str,
    token: String,
    user_data: AuthenticatedUser,
}

#[derive(Serialize)]
struct MeResponse {
    greeting: String,
    #[serde(flatten)]
    user: AuthenticatedUser,
}

async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(&payload.username)
        .await
        .db_err("Failed to look up user")?;

    let Some(user) = user else {
        warn!("Login attempt for unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let matches = verify_password(&payload.password, &user.password_hash)
        .internal_err("Failed to verify password")?;
    if !matches {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&state.db, user.id, unix_now(), &state.auth)
        .await
        .db_err("Failed to issue token")?;

    info!(user_id = user.id, name = %user.display_name(), "User logged in");

    Ok(Json(LoginResponse {
        status: "success",
        message: "Login successful",
        token,
        user_data: user.into(),
    }))
}

async fn me(Auth(user): Auth) -> impl IntoResponse {
    Json(MeResponse {
        greeting: format!("Hello, {}!", user.first_name),
        user,
    })
}
