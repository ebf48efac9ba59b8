// errors.rs
use astra::Response;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::validation::{BusinessRule, FieldError};

/// Errors originating from either the server logic
/// (routing, input checks, booking rules) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    /// Structural input failures, reported together.
    #[error("Validation failed: {}", summarize(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("{0}")]
    BusinessRuleViolation(BusinessRule),

    /// Overlap with an existing booking on the same listing; nothing was written.
    #[error("Selected dates overlap an existing booking ({existing_start} to {existing_end})")]
    Conflict {
        existing_start: NaiveDate,
        existing_end: NaiveDate,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field)
        .collect::<Vec<_>>()
        .join(", ")
}
