//! Shared fixtures for the pipeline integration tests.

#![allow(dead_code)]

use std::path::Path;

use chrono::{TimeZone, Utc};
use field2go_core::dataset::SamplingParams;
use field2go_core::model::ForestParams;
use field2go_core::records::{Field, Reservation, User};
use field2go_core::store::InMemoryStore;
use field2go_core::training::TrainingParams;
use field2go_core::types::Timestamp;
use field2go_pipeline::config::PipelineConfig;

pub const USERS: usize = 6;
pub const FIELDS: usize = 5;

fn at(day: u32, hour: u32) -> Option<Timestamp> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).single()
}

/// Six users, five fields and two reservations per user. `U1` never
/// reserved `F1`.
pub fn store() -> InMemoryStore {
    let users = (1..=USERS).map(|i| User::new(format!("U{i}"))).collect();
    let fields = vec![
        Field::new("F1", "tennis", "downtown", 50.0),
        Field::new("F2", "football", "uptown", 120.0),
        Field::new("F3", "basketball", "downtown", 80.0),
        Field::new("F4", "tennis", "riverside", 45.0),
        Field::new("F5", "football", "downtown", 100.0),
    ];
    let reservations = vec![
        Reservation::new("U1", "F2", Some(2.0), at(3, 18)),
        Reservation::new("U1", "F3", Some(1.5), at(5, 19)),
        Reservation::new("U2", "F1", Some(1.0), at(4, 10)),
        Reservation::new("U2", "F4", Some(2.0), at(8, 11)),
        Reservation::new("U3", "F1", Some(2.0), at(6, 17)),
        Reservation::new("U3", "F5", None, at(9, 16)),
        Reservation::new("U4", "F2", Some(1.0), at(7, 20)),
        Reservation::new("U4", "F3", Some(3.0), None),
        Reservation::new("U5", "F4", Some(2.0), at(10, 9)),
        Reservation::new("U5", "F5", Some(1.5), at(11, 18)),
        Reservation::new("U6", "F1", Some(1.0), at(12, 8)),
        Reservation::new("U6", "F3", Some(2.0), at(13, 21)),
    ];
    InMemoryStore::new(users, fields, reservations)
}

/// Seeded configuration with artifacts under `dir`.
pub fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        database_url: None,
        dataset_path: dir.join("dataset.csv"),
        model_path: dir.join("model.json"),
        sampling: SamplingParams::default(),
        sampling_seed: Some(7),
        training: TrainingParams {
            forest: ForestParams { trees: 20, seed: 42 },
            ..TrainingParams::default()
        },
        manual_prediction: false,
    }
}
