// src/domain/validation.rs

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::domain::booking::{BookingDraft, BookingRequest, Stay};
use crate::errors::ServerError;

lazy_static! {
    // Basic address shape: local@domain.tld
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9-]+(\.[A-Z0-9-]+)*\.[A-Z]{2,}$").unwrap();
}

/// One failing request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Business rules checked once the dates have parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRule {
    ArrivalBeforeDeparture,
    ArrivalNotInPast,
}

impl fmt::Display for BusinessRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessRule::ArrivalBeforeDeparture => {
                write!(f, "Arrival date must be before departure date")
            }
            BusinessRule::ArrivalNotInPast => write!(f, "Arrival date cannot be in the past"),
        }
    }
}

/// Check a raw booking request and turn it into a draft.
///
/// Structural problems (missing listing, blank name, unparseable dates,
/// malformed contact) are collected and returned together. The date-ordering
/// and past-date rules run afterwards, one at a time.
pub fn validate_booking(
    req: &BookingRequest,
    today: NaiveDate,
) -> Result<BookingDraft, ServerError> {
    let mut errors = Vec::new();

    let listing_id = req.listing_id.as_deref().unwrap_or("");
    if listing_id.is_empty() {
        errors.push(FieldError {
            field: "listing_id",
            message: "Listing ID is required.",
        });
    }

    let guest_name = req.guest_name.as_deref().unwrap_or("").trim();
    if guest_name.is_empty() {
        errors.push(FieldError {
            field: "guest_name",
            message: "Guest name is required.",
        });
    }

    let arrival = req.arrival.as_deref().and_then(parse_iso_date);
    if arrival.is_none() {
        errors.push(FieldError {
            field: "arrival",
            message: "Arrival date must be a valid date (YYYY-MM-DD).",
        });
    }

    let departure = req.departure.as_deref().and_then(parse_iso_date);
    if departure.is_none() {
        errors.push(FieldError {
            field: "departure",
            message: "Departure date must be a valid date (YYYY-MM-DD).",
        });
    }

    let contact = req.contact.as_deref().unwrap_or("");
    if !EMAIL_REGEX.is_match(contact) {
        errors.push(FieldError {
            field: "contact",
            message: "Contact must be a valid email address.",
        });
    }

    let (start, end) = match (arrival, departure) {
        (Some(start), Some(end)) if errors.is_empty() => (start, end),
        _ => return Err(ServerError::ValidationFailed(errors)),
    };

    if start >= end {
        return Err(ServerError::BusinessRuleViolation(
            BusinessRule::ArrivalBeforeDeparture,
        ));
    }
    if start < today {
        return Err(ServerError::BusinessRuleViolation(
            BusinessRule::ArrivalNotInPast,
        ));
    }

    Ok(BookingDraft {
        listing_id: listing_id.to_string(),
        guest_name: guest_name.to_string(),
        stay: Stay { start, end },
        contact: contact.to_string(),
    })
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its calendar date.
fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
