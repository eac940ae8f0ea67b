//! Operational records read from the record store.
//!
//! Only the attributes the pipeline consumes are modelled; everything else
//! the store keeps about users and fields (names, avatars, images) is
//! ignored.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// A registered user. Only the identifier matters for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
}

/// A bookable sports field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: RecordId,
    pub sport_type: String,
    pub location: String,
    pub price_per_hour: f64,
}

/// A reservation of one field by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub user_id: RecordId,
    pub field_id: RecordId,
    /// Booked hours. Older records may not carry it.
    pub duration: Option<f64>,
    pub date: Option<Timestamp>,
}

impl User {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self { id: id.into() }
    }
}

impl Field {
    pub fn new(
        id: impl Into<RecordId>,
        sport_type: impl Into<String>,
        location: impl Into<String>,
        price_per_hour: f64,
    ) -> Self {
        Self {
            id: id.into(),
            sport_type: sport_type.into(),
            location: location.into(),
            price_per_hour,
        }
    }
}

impl Reservation {
    pub fn new(
        user_id: impl Into<RecordId>,
        field_id: impl Into<RecordId>,
        duration: Option<f64>,
        date: Option<Timestamp>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            field_id: field_id.into(),
            duration,
            date,
        }
    }
}
