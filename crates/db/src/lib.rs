//! PostgreSQL access to the operational records (users, fields,
//! reservations).
//!
//! The pipeline only reads; [`store::PgRecordStore`] exposes the tables
//! through the core [`RecordStore`](field2go_core::store::RecordStore) trait.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgRecordStore;

pub type DbPool = sqlx::PgPool;

/// Pool size. The pipeline issues one query at a time.
const MAX_CONNECTIONS: u32 = 2;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the connection works.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the schema migrations under `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
