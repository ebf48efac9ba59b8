// src/domain/booking_id.rs
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::ServerError;

pub const BOOKING_ID_BYTES: usize = 12;

/// Booking key: 4 bytes of big-endian unix seconds followed by 8 random bytes,
/// rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookingId([u8; BOOKING_ID_BYTES]);

impl BookingId {
    /// New id stamped with `now` (unix seconds), using the OS RNG.
    pub fn generate(now: i64) -> Self {
        Self::generate_with(&mut OsRng, now)
    }

    pub fn generate_with<R: RngCore>(rng: &mut R, now: i64) -> Self {
        let mut raw = [0u8; BOOKING_ID_BYTES];
        raw[..4].copy_from_slice(&(now as u32).to_be_bytes());
        rng.fill_bytes(&mut raw[4..]);
        Self(raw)
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for BookingId {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != BOOKING_ID_BYTES * 2 {
            return Err(ServerError::InvalidIdentifier(s.to_string()));
        }
        let mut raw = [0u8; BOOKING_ID_BYTES];
        hex::decode_to_slice(s, &mut raw)
            .map_err(|_| ServerError::InvalidIdentifier(s.to_string()))?;
        Ok(Self(raw))
    }
}

impl Serialize for BookingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
