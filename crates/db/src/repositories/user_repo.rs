//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::UserRow;

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, email, created_at";

/// Read access to users.
pub struct UserRepo;

impl UserRepo {
    /// All users in collection order (creation time, then id).
    pub async fn list(pool: &PgPool) -> Result<Vec<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at, id");
        sqlx::query_as::<_, UserRow>(&query).fetch_all(pool).await
    }
}
