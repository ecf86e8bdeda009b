//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingHeader,
    MalformedHeader,
    TokenNotFound,
    TokenExpired,
    StoreError,
}

impl Rejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingHeader | Self::MalformedHeader | Self::TokenNotFound | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingHeader => "Authorization header is missing",
            Self::MalformedHeader => "Authorization header has an invalid format",
            Self::TokenNotFound => "Token not found",
            Self::TokenExpired => "Token is too old",
            Self::StoreError => "Internal server error",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Rejection {}

/// Response for a refused protected request.
///
/// Always a 401 with a fixed body; the reason stays in the server log.
#[derive(Debug)]
pub struct AuthError {
    rejection: Rejection,
}

impl AuthError {
    pub fn reason(&self) -> Rejection {
        self.rejection
    }
}

impl From<Rejection> for AuthError {
    fn from(rejection: Rejection) -> Self {
        Self { rejection }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Unauthorized",
            }),
        )
            .into_response()
    }
}
