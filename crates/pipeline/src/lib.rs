//! `field2go-pipeline` library crate.
//!
//! Holds the configuration and the three pipeline commands so they can be
//! driven from integration tests. The binaries under `src/bin/` are thin
//! wrappers:
//!
//! | Binary          | Reads                     | Writes               |
//! |-----------------|---------------------------|----------------------|
//! | `build-dataset` | record store              | dataset CSV          |
//! | `train-model`   | dataset CSV               | model artifact       |
//! | `predict`       | model, dataset CSV, store | one JSON document    |

pub mod commands;
pub mod config;
pub mod telemetry;
