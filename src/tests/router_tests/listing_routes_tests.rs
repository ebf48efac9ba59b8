use crate::errors::ServerError;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::tests::utils::{body_string, init_test_db, seed_sample_listings};
use astra::Body;
use http::{Method, Request};
use serde_json::Value;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get_json(db: &crate::db::Database, uri: &str) -> Value {
    let resp = handle(get(uri), db).expect("Handler failed");
    assert_eq!(resp.status(), 200, "{uri}");
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json"
    );
    serde_json::from_str(&body_string(resp)).unwrap()
}

#[test]
fn listings_without_filters_sample_ten() {
    let db = init_test_db();
    seed_sample_listings(&db);

    let body = get_json(&db, "/api/listings");
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 10);

    for l in listings {
        assert!(l["id"].is_string());
        assert!(l["name"].is_string());
        assert!(l["price"].is_number());
    }
}

#[test]
fn blank_filters_count_as_absent() {
    let db = init_test_db();
    seed_sample_listings(&db);

    let body = get_json(&db, "/api/listings?market=&property_type=&bedrooms=");
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[test]
fn listings_filter_by_query() {
    let db = init_test_db();
    seed_sample_listings(&db);

    let body = get_json(&db, "/listings?market=Rio+De+Janeiro&bedrooms=1");
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], "10009999");
    assert_eq!(listings[0]["price"], 317.0);
}

#[test]
fn non_numeric_bedrooms_is_a_bad_request() {
    let db = init_test_db();

    let err = handle(get("/api/listings?bedrooms=two"), &db).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert_eq!(error_to_response(err).status(), 400);
}

#[test]
fn single_listing_detail() {
    let db = init_test_db();
    seed_sample_listings(&db);

    for uri in ["/api/listing/10030955", "/api/listings/10030955"] {
        let body = get_json(&db, uri);
        assert_eq!(body["name"], "Apt Linda Vista Lagoa");
        assert_eq!(body["price"], 701.5);
        assert_eq!(body["description"], "Apt Linda Vista Lagoa in Rio De Janeiro");
    }
}

#[test]
fn missing_listing_is_404() {
    let db = init_test_db();

    let err = handle(get("/api/listing/0000"), &db).unwrap_err();
    assert!(matches!(err, ServerError::NotFound(_)));
    assert_eq!(error_to_response(err).status(), 404);
}

#[test]
fn markets_and_property_types() {
    let db = init_test_db();
    seed_sample_listings(&db);

    assert_eq!(
        get_json(&db, "/api/listings/markets"),
        serde_json::json!(["Porto", "Rio De Janeiro"])
    );
    assert_eq!(
        get_json(&db, "/api/listings/propertyTypes"),
        serde_json::json!(["Apartment", "House", "Loft"])
    );
}

#[test]
fn unknown_route_is_404() {
    let db = init_test_db();

    let err = handle(get("/api/nothing/here"), &db).unwrap_err();
    assert_eq!(error_to_response(err).status(), 404);

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/api/bookings/665a64800000000000000000")
        .body(Body::empty())
        .unwrap();
    assert!(matches!(handle(req, &db), Err(ServerError::NotFound(_))));
}
