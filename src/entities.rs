use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub done: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// A todo together with its owner's username, for ownership checks and listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TodoWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub todo: Todo,
    pub username: String,
}

impl TodoWithOwner {
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
}
