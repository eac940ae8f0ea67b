//! Labeled dataset construction and its CSV representation.
//!
//! [`build_dataset`] joins reservations against users and fields to produce
//! positive examples, then draws a bounded number of unreserved fields per
//! user as negative examples. The result is a flat table of
//! [`TrainingExample`] rows written with [`write_dataset`] and read back by
//! the trainer and the predictor with [`read_dataset`].

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::records::{Field, Reservation, User};
use crate::types::{RecordId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of negative examples drawn per user.
pub const DEFAULT_NEGATIVES_PER_USER: usize = 3;

/// Day-of-week value used when an example has no date.
pub const WEEKDAY_SENTINEL: i32 = -1;

/// Column header of the dataset file, in order.
pub const DATASET_HEADER: [&str; 8] = [
    "user_id",
    "field_id",
    "sportType",
    "location",
    "pricePerHour",
    "duration",
    "date",
    "reserved",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of the labeled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub user_id: RecordId,
    pub field_id: RecordId,
    #[serde(rename = "sportType")]
    pub sport_type: String,
    pub location: String,
    #[serde(rename = "pricePerHour")]
    pub price_per_hour: f64,
    pub duration: Option<f64>,
    #[serde(with = "csv_date")]
    pub date: Option<Timestamp>,
    /// `1` when the pair was actually reserved, `0` for a sampled negative.
    pub reserved: u8,
}

impl TrainingExample {
    /// Whether this row is a positive example.
    pub fn is_reserved(&self) -> bool {
        self.reserved != 0
    }

    /// Booked hours, with a missing duration counted as zero.
    pub fn effective_duration(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// Monday = 0 .. Sunday = 6, or [`WEEKDAY_SENTINEL`] without a date.
    pub fn weekday(&self) -> i32 {
        weekday_of(self.date.as_ref())
    }

    fn positive(user_id: &RecordId, field: &Field, reservation: &Reservation) -> Self {
        Self {
            user_id: user_id.clone(),
            field_id: field.id.clone(),
            sport_type: field.sport_type.clone(),
            location: field.location.clone(),
            price_per_hour: field.price_per_hour,
            duration: reservation.duration,
            date: reservation.date,
            reserved: 1,
        }
    }

    fn negative(user_id: &RecordId, field: &Field) -> Self {
        Self {
            user_id: user_id.clone(),
            field_id: field.id.clone(),
            sport_type: field.sport_type.clone(),
            location: field.location.clone(),
            price_per_hour: field.price_per_hour,
            duration: Some(0.0),
            date: None,
            reserved: 0,
        }
    }
}

/// Monday = 0 .. Sunday = 6 for a date, [`WEEKDAY_SENTINEL`] for none.
pub fn weekday_of(date: Option<&Timestamp>) -> i32 {
    date.map(|d| d.weekday().num_days_from_monday() as i32)
        .unwrap_or(WEEKDAY_SENTINEL)
}

/// Knobs for negative sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingParams {
    pub negatives_per_user: usize,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            negatives_per_user: DEFAULT_NEGATIVES_PER_USER,
        }
    }
}

/// Counters describing one dataset build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub users: usize,
    pub positives: usize,
    pub negatives: usize,
    /// Reservations dropped because their field no longer exists.
    pub skipped_reservations: usize,
    /// Reservations that repeated an already-seen (user, field) pair.
    pub duplicate_pairs: usize,
}

/// Output of [`build_dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltDataset {
    pub examples: Vec<TrainingExample>,
    pub summary: BuildSummary,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the labeled dataset.
///
/// Rows are grouped per user in user collection order: first the user's
/// positive examples, then the sampled negatives. A (user, field) pair that
/// was reserved several times yields a single positive row, placed where the
/// pair first occurred and carrying the attributes of its last reservation.
/// Reservations pointing at a missing field are skipped.
pub fn build_dataset<R: Rng + ?Sized>(
    users: &[User],
    fields: &[Field],
    reservations: &[Reservation],
    params: &SamplingParams,
    rng: &mut R,
) -> BuiltDataset {
    let fields_by_id: HashMap<&RecordId, &Field> = fields.iter().map(|f| (&f.id, f)).collect();

    let mut summary = BuildSummary {
        users: users.len(),
        ..BuildSummary::default()
    };

    // Insertion-ordered map keyed by (user, field); later duplicates overwrite.
    let mut slots: HashMap<(&RecordId, &RecordId), usize> = HashMap::new();
    let mut latest: Vec<&Reservation> = Vec::new();
    for reservation in reservations {
        match slots.entry((&reservation.user_id, &reservation.field_id)) {
            Entry::Occupied(slot) => {
                tracing::warn!(
                    user_id = %reservation.user_id,
                    field_id = %reservation.field_id,
                    "Duplicate reservation for pair, keeping the latest",
                );
                latest[*slot.get()] = reservation;
                summary.duplicate_pairs += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(latest.len());
                latest.push(reservation);
            }
        }
    }

    let mut by_user: HashMap<&RecordId, Vec<&Reservation>> = HashMap::new();
    for reservation in latest {
        by_user
            .entry(&reservation.user_id)
            .or_default()
            .push(reservation);
    }

    let mut examples = Vec::new();
    for user in users {
        let booked = by_user.get(&user.id).map(Vec::as_slice).unwrap_or(&[]);

        for reservation in booked {
            match fields_by_id.get(&reservation.field_id) {
                Some(field) => {
                    examples.push(TrainingExample::positive(&user.id, field, reservation));
                    summary.positives += 1;
                }
                None => {
                    tracing::debug!(
                        user_id = %user.id,
                        field_id = %reservation.field_id,
                        "Skipping reservation for unknown field",
                    );
                    summary.skipped_reservations += 1;
                }
            }
        }

        let reserved: HashSet<&RecordId> = booked.iter().map(|r| &r.field_id).collect();
        let candidates: Vec<&Field> = fields
            .iter()
            .filter(|f| !reserved.contains(&f.id))
            .collect();

        let amount = params.negatives_per_user.min(candidates.len());
        if amount == 0 {
            continue;
        }
        for idx in rand::seq::index::sample(rng, candidates.len(), amount) {
            examples.push(TrainingExample::negative(&user.id, candidates[idx]));
            summary.negatives += 1;
        }
    }

    BuiltDataset { examples, summary }
}

// ---------------------------------------------------------------------------
// CSV I/O
// ---------------------------------------------------------------------------

/// Write examples as CSV. The header is always written, even for no rows.
pub fn write_examples<W: io::Write>(writer: W, examples: &[TrainingExample]) -> Result<(), CoreError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(DATASET_HEADER)?;
    for example in examples {
        writer.serialize(example)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read examples from CSV with the [`DATASET_HEADER`] columns.
pub fn read_examples<R: io::Read>(reader: R) -> Result<Vec<TrainingExample>, CoreError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut examples = Vec::new();
    for row in reader.deserialize() {
        examples.push(row?);
    }
    Ok(examples)
}

/// Write the dataset file at `path`, replacing any previous one.
pub fn write_dataset(path: &Path, examples: &[TrainingExample]) -> Result<(), CoreError> {
    let file = std::fs::File::create(path)?;
    write_examples(file, examples)
}

/// Read the dataset file at `path`.
pub fn read_dataset(path: &Path) -> Result<Vec<TrainingExample>, CoreError> {
    let file = std::fs::File::open(path).map_err(|e| {
        CoreError::Dataset(format!("cannot open {}: {e}", path.display()))
    })?;
    read_examples(file)
}

/// Lenient date parsing: RFC 3339, `YYYY-MM-DD HH:MM:SS[.f]` or `YYYY-MM-DD`.
///
/// Anything else is treated as a missing date.
pub fn parse_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

mod csv_date {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Timestamp;

    pub fn serialize<S: Serializer>(date: &Option<Timestamp>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_some(&d.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Timestamp>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(super::parse_date))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
