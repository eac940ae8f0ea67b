//! Repository for the `fields` table.

use sqlx::PgPool;

use crate::models::field::FieldRow;

/// Column list for `fields` queries.
const COLUMNS: &str = "id, name, sport_type, location, price_per_hour, created_at";

/// Read access to fields.
pub struct FieldRepo;

impl FieldRepo {
    /// All fields in collection order (creation time, then id).
    pub async fn list(pool: &PgPool) -> Result<Vec<FieldRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fields ORDER BY created_at, id");
        sqlx::query_as::<_, FieldRow>(&query).fetch_all(pool).await
    }

    /// Find a field by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<FieldRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fields WHERE id = $1");
        sqlx::query_as::<_, FieldRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
