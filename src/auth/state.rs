//! Authentication settings, state trait and macro.

use std::time::Duration;

use crate::db::Database;

/// How long an issued token stays valid.
pub const TOKEN_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Fixed pause before answering a lookup miss. Blunts timing-based token
/// enumeration; it is not a rate limiter.
pub const LOOKUP_MISS_DELAY: Duration = Duration::from_secs(2);

/// Token lifetime policy shared by the issuer and the validator.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token_max_age: Duration,
    pub lookup_miss_delay: Duration,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_max_age: TOKEN_MAX_AGE,
            lookup_miss_delay: LOOKUP_MISS_DELAY,
        }
    }
}

impl AuthSettings {
    /// Whether a token issued at `issued_at` is past its age limit at `now`.
    /// Both are unix seconds. A token exactly at the limit is still valid.
    pub fn is_expired(&self, issued_at: i64, now: i64) -> bool {
        let max_age = i64::try_from(self.token_max_age.as_secs()).unwrap_or(i64::MAX);
        now.saturating_sub(issued_at) > max_age
    }
}

/// Trait for state types that provide what the auth gate needs.
pub trait HasAuthBackend {
    fn db(&self) -> &Database;
    fn auth_settings(&self) -> &AuthSettings;
}

/// Macro to implement `HasAuthBackend` for state structs with the standard fields.
///
/// The struct must have these fields:
/// - `db: Database`
/// - `auth: Arc<AuthSettings>`
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// pub struct MyState {
///     pub db: Database,
///     pub auth: Arc<AuthSettings>,
/// }
///
/// impl_has_auth_backend!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn db(&self) -> &$crate::db::Database {
                &self.db
            }
            fn auth_settings(&self) -> &$crate::auth::AuthSettings {
                &self.auth
            }
        }
    };
}
