use crate::domain::validation::FieldError;
use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

/// HTTP status for each error kind.
pub fn status_for(err: &ServerError) -> u16 {
    match err {
        ServerError::ValidationFailed(_)
        | ServerError::BusinessRuleViolation(_)
        | ServerError::Conflict { .. }
        | ServerError::InvalidIdentifier(_)
        | ServerError::BadRequest(_) => 400,
        ServerError::NotFound(_) => 404,
        ServerError::StorageUnavailable(_) | ServerError::InternalError => 500,
    }
}

/// Convert a ServerError into a JSON error response.
/// Storage details are logged here and never sent to the client.
pub fn error_to_response(err: ServerError) -> Response {
    let status = status_for(&err);

    let body = match &err {
        ServerError::ValidationFailed(errors) => ErrorBody {
            error: "Validation failed".to_string(),
            errors: Some(errors.as_slice()),
        },
        ServerError::StorageUnavailable(msg) => {
            tracing::error!(error = %msg, "storage failure");
            ErrorBody {
                error: "Service temporarily unavailable, please try again".to_string(),
                errors: None,
            }
        }
        other => ErrorBody {
            error: other.to_string(),
            errors: None,
        },
    };

    let json = serde_json::to_vec(&body).unwrap_or_else(|_| br#"{"error":"Internal Server Error"}"#.to_vec());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(json))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
