//! Login token storage.
//!
//! Tokens are opaque random strings. A user may have several rows; the one
//! with the latest `added_at` is the one trusted. Expired rows are removed
//! lazily by whoever finds them, never by a sweep.

use sqlx::sqlite::SqlitePool;

use super::user::User;

/// Store for issued login tokens.
pub struct TokenStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TokenOwnerRow {
    id: i64,
    user_type: i64,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    added_at: i64,
}

impl TokenOwnerRow {
    fn into_parts(self) -> (User, i64) {
        let user = User {
            id: self.id,
            user_type: self.user_type,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
        };
        (user, self.added_at)
    }
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a token issued to `user_id` at `issued_at` (unix seconds).
    pub async fn insert(&self, token: &str, user_id: i64, issued_at: i64) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO login_tokens (token, user_id, added_at) VALUES (?, ?, ?)")
            .bind(token)
            .bind(user_id)
            .bind(issued_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Most recently issued token for a user, with its issuance time.
    pub async fn find_most_recent_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT token, added_at FROM login_tokens WHERE user_id = ? ORDER BY added_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Resolve a token to its owning user and issuance time.
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<(User, i64)>, sqlx::Error> {
        let row: Option<TokenOwnerRow> = sqlx::query_as(
            "SELECT u.id, u.user_type, u.first_name, u.last_name, u.email, u.password_hash, t.added_at
             FROM login_tokens t JOIN users u ON u.id = t.user_id
             WHERE t.token = ?
             ORDER BY t.added_at DESC LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(TokenOwnerRow::into_parts))
    }

    /// Delete a token by value. Returns whether a row was removed.
    pub async fn delete(&self, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM login_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
