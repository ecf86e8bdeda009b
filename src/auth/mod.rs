//! Session token authentication.
//!
//! Login issues an opaque random bearer token stored in the database. Every
//! protected request presents it as `Authorization: Bearer <token>`. Tokens
//! older than 24 hours are rejected and deleted when next seen.

mod errors;
mod extractors;
mod issuer;
mod state;
mod types;
mod validator;

use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

pub use errors::{AuthError, Rejection};
pub use extractors::Auth;
pub use issuer::{generate_token, issue_token};
pub use state::{AuthSettings, HasAuthBackend, LOOKUP_MISS_DELAY, TOKEN_MAX_AGE};
pub use types::AuthenticatedUser;
pub use validator::{BEARER_PREFIX, validate_bearer};

/// Current wall-clock time as unix seconds.
///
/// A clock set before 1970 reads as 0, which makes every stored token look
/// issued in the future, so nothing expires until the clock is fixed.
pub fn unix_now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => {
            warn!(error = %e, "System clock is before the unix epoch; token expiry is disabled");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_now_tracks_system_clock() {
        let expected = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let now = unix_now();
        assert!(now > 0);
        assert!((now - expected).abs() <= 1);
    }
}
