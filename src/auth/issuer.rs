//! Token issuance at login.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tracing::debug;

use super::state::AuthSettings;
use crate::db::Database;

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Generate a fresh opaque token string.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Return the user's current token, or mint a new one.
///
/// Re-login within the validity window yields the same token. An expired
/// current token is deleted before a replacement is inserted. Older rows
/// that are not the most recent are left alone; only the newest is trusted.
pub async fn issue_token(
    db: &Database,
    user_id: i64,
    now: i64,
    settings: &AuthSettings,
) -> Result<String, sqlx::Error> {
    let tokens = db.tokens();

    if let Some((token, issued_at)) = tokens.find_most_recent_for_user(user_id).await? {
        if !settings.is_expired(issued_at, now) {
            debug!(user_id, "reusing current token");
            return Ok(token);
        }
        tokens.delete(&token).await?;
        debug!(user_id, "deleted expired token");
    }

    let token = generate_token();
    tokens.insert(&token, user_id, now).await?;
    debug!(user_id, "issued new token");
    Ok(token)
}
