mod auth;
mod error;
mod lost_and_found;

use axum::Router;
use std::sync::Arc;

use crate::auth::AuthSettings;
use crate::db::Database;

pub use error::ApiError;

/// Create the API router.
pub fn create_api_router(db: Database, auth: Arc<AuthSettings>) -> Router {
    let auth_state = auth::AuthState {
        db: db.clone(),
        auth: auth.clone(),
    };

    let lost_and_found_state = lost_and_found::LostAndFoundState { db, auth };

    Router::new()
        .nest("/auth", auth::router(auth_state))
        .nest(
            "/data/lost-and-found",
            lost_and_found::router(lost_and_found_state),
        )
}
