// src/domain/booking.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::booking_id::BookingId;

/// Raw booking request as submitted by the booking form or a JSON client.
/// Every field is optional here; presence is the validator's job.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    #[serde(deserialize_with = "opaque_key")]
    pub listing_id: Option<String>,
    pub guest_name: Option<String>,
    pub arrival: Option<String>,
    pub departure: Option<String>,
    pub contact: Option<String>,
}

impl BookingRequest {
    /// Build from decoded form pairs. Later duplicates win; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut req = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_ref() {
                "listing_id" => &mut req.listing_id,
                "guest_name" => &mut req.guest_name,
                "arrival" => &mut req.arrival,
                "departure" => &mut req.departure,
                "contact" => &mut req.contact,
                _ => continue,
            };
            *slot = Some(v.into());
        }
        req
    }
}

/// Listing keys are opaque: JSON clients may send them as strings or numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum OpaqueKey {
    Text(String),
    Number(serde_json::Number),
}

fn opaque_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(
        Option::<OpaqueKey>::deserialize(deserializer)?.map(|key| match key {
            OpaqueKey::Text(s) => s,
            OpaqueKey::Number(n) => n.to_string(),
        }),
    )
}

/// Half-open date range `[start, end)`: a guest leaves on `end`, so another
/// stay may begin that same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Stay {
    /// Same predicate the conflict query runs in SQL.
    pub fn overlaps(&self, other: &Stay) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// A request that passed validation: trimmed name, parsed dates.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub listing_id: String,
    pub guest_name: String,
    pub stay: Stay,
    pub contact: String,
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: String,
    pub guest_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub contact: String,
    pub created_at: NaiveDateTime,
}
