//! Axum extractors for authentication.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{error, info};

use super::errors::{AuthError, Rejection};
use super::state::HasAuthBackend;
use super::types::AuthenticatedUser;
use super::unix_now;
use super::validator::validate_bearer;

/// Extractor for endpoints that require a valid bearer token.
///
/// Rejects with a generic 401 before the handler runs. Handlers that need
/// to know who is calling (e.g. to stamp a submitter) read the user from it.
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION);

        match validate_bearer(state.db(), header, unix_now(), state.auth_settings()).await {
            Ok(user) => Ok(Auth(user)),
            Err(rejection) => {
                if rejection == Rejection::StoreError {
                    error!(path = %parts.uri.path(), "Rejected request: {}", rejection);
                } else {
                    info!(path = %parts.uri.path(), "Rejected request: {}", rejection);
                }
                Err(rejection.into())
            }
        }
    }
}
