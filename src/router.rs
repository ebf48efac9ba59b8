use crate::db::{bookings, listings, Database};
use crate::domain::booking::BookingRequest;
use crate::domain::booking_id::BookingId;
use crate::domain::listing::ListingFilter;
use crate::domain::validation::validate_booking;
use crate::errors::ServerError;
use crate::responses::{json_response, redirect_response, ResultResp};
use astra::Request;
use chrono::Local;
use std::io::Read;
use url::form_urlencoded;

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Routes are served both bare and under `/api`.
pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let full_path = req.uri().path().to_string();
    let path = full_path
        .strip_prefix("/api")
        .filter(|p| p.starts_with('/'))
        .unwrap_or(&full_path);
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["listings"]) => {
            let filter = listing_filter(&req)?;
            json_response(200, &listings::search_listings(db, &filter)?)
        }
        ("GET", ["listings", "markets"]) => json_response(200, &listings::distinct_markets(db)?),
        ("GET", ["listings", "propertyTypes"]) => {
            json_response(200, &listings::distinct_property_types(db)?)
        }
        ("GET", ["listing" | "listings", id]) => json_response(200, &listings::get_listing(db, id)?),

        ("POST", ["bookings"]) => create_booking(&mut req, db),
        ("GET", ["bookings", id]) => {
            let id: BookingId = id.parse()?;
            json_response(200, &bookings::get_booking(db, &id)?)
        }

        _ => Err(ServerError::NotFound("Route")),
    }
}

fn create_booking(req: &mut Request, db: &Database) -> ResultResp {
    let wants_json = is_json(req);
    let body = read_body(req)?;

    let booking_req = if wants_json {
        serde_json::from_slice::<BookingRequest>(&body)
            .map_err(|e| ServerError::BadRequest(format!("invalid JSON body: {e}")))?
    } else {
        BookingRequest::from_pairs(form_urlencoded::parse(&body))
    };

    let draft = validate_booking(&booking_req, Local::now().date_naive())?;
    let id = bookings::create_booking(db, &draft)?;

    if wants_json {
        json_response(201, &serde_json::json!({ "booking_id": id }))
    } else {
        redirect_response(&format!("/confirmation.html?booking_id={id}"))
    }
}

/// Query-string filters; blank values are treated as absent.
fn listing_filter(req: &Request) -> Result<ListingFilter, ServerError> {
    let mut filter = ListingFilter::default();
    let query = req.uri().query().unwrap_or("");

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "market" => filter.market = Some(value.to_string()),
            "property_type" => filter.property_type = Some(value.to_string()),
            "bedrooms" => {
                let n = value.parse().map_err(|_| {
                    ServerError::BadRequest(format!("bedrooms must be an integer, got {value:?}"))
                })?;
                filter.bedrooms = Some(n);
            }
            _ => {}
        }
    }

    Ok(filter)
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .map(|m| m.essence_str() == mime::APPLICATION_JSON.essence_str())
        .unwrap_or(false)
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    if buf.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(buf)
}
