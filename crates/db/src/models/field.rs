//! Field entity model.

use field2go_core::records::Field;
use field2go_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FieldRow {
    pub id: String,
    pub name: String,
    pub sport_type: String,
    pub location: String,
    pub price_per_hour: f64,
    pub created_at: Timestamp,
}

impl From<FieldRow> for Field {
    fn from(row: FieldRow) -> Self {
        Field::new(row.id, row.sport_type, row.location, row.price_per_hour)
    }
}
