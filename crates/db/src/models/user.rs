//! User entity model.

use field2go_core::records::User;
use field2go_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(row.id)
    }
}
