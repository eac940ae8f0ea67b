//! The pipeline stages. Each takes its inputs explicitly so tests can run
//! them against an in-memory store and temporary files.

pub mod build_dataset;
pub mod predict;
pub mod train;
