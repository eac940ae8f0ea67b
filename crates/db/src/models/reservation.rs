//! Reservation entity model.

use field2go_core::records::Reservation;
use field2go_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationRow {
    pub id: DbId,
    pub user_id: String,
    pub field_id: String,
    pub duration: Option<f64>,
    pub date: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation::new(row.user_id, row.field_id, row.duration, row.date)
    }
}
