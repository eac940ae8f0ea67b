//! [`RecordStore`] backed by PostgreSQL.

use async_trait::async_trait;
use field2go_core::error::CoreError;
use field2go_core::records::{Field, Reservation, User};
use field2go_core::store::RecordStore;
use field2go_core::types::RecordId;

use crate::repositories::{FieldRepo, ReservationRepo, UserRepo};
use crate::DbPool;

/// Read-only record store over a connection pool.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn store_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Record store query failed");
    CoreError::Store(err.to_string())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn users(&self) -> Result<Vec<User>, CoreError> {
        let rows = UserRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn fields(&self) -> Result<Vec<Field>, CoreError> {
        let rows = FieldRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Field::from).collect())
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, CoreError> {
        let rows = ReservationRepo::list(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Reservation::from).collect())
    }

    async fn find_field(&self, id: &RecordId) -> Result<Option<Field>, CoreError> {
        let row = FieldRepo::find_by_id(&self.pool, id.as_str())
            .await
            .map_err(store_error)?;
        Ok(row.map(Field::from))
    }

    async fn find_reservation(
        &self,
        user_id: &RecordId,
        field_id: &RecordId,
    ) -> Result<Option<Reservation>, CoreError> {
        let row =
            ReservationRepo::find_latest_for_pair(&self.pool, user_id.as_str(), field_id.as_str())
                .await
                .map_err(store_error)?;
        Ok(row.map(Reservation::from))
    }
}
