//! Authentication user types.

use serde::Serialize;

use crate::db::User;

/// The user a valid bearer token resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub user_type: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_type: user.user_type,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
