//! Domain logic of the field reservation predictor.
//!
//! Pure and database-free: the record store is reached through the
//! [`store::RecordStore`] trait, implemented for PostgreSQL in
//! `field2go-db`.

pub mod dataset;
pub mod encoding;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod records;
pub mod store;
pub mod training;
pub mod types;
