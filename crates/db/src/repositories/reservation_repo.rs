//! Repository for the `reservations` table.

use sqlx::PgPool;

use crate::models::reservation::ReservationRow;

/// Column list for `reservations` queries.
const COLUMNS: &str = "id, user_id, field_id, duration, date, created_at";

/// Read access to reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// All reservations in collection order (creation time, then id).
    pub async fn list(pool: &PgPool) -> Result<Vec<ReservationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations ORDER BY created_at, id");
        sqlx::query_as::<_, ReservationRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// The latest reservation (in collection order) of `user_id` on `field_id`.
    pub async fn find_latest_for_pair(
        pool: &PgPool,
        user_id: &str,
        field_id: &str,
    ) -> Result<Option<ReservationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE user_id = $1 AND field_id = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(user_id)
            .bind(field_id)
            .fetch_optional(pool)
            .await
    }
}
