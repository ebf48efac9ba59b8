use crate::db::connection::{Database, DEFAULT_BUSY_TIMEOUT};
use crate::db::listings::save_listings;
use crate::domain::booking::{BookingDraft, Stay};
use crate::domain::listing::Listing;
use astra::Response;
use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A unique temp-file path for one test database
pub fn temp_db_path() -> String {
    std::env::temp_dir()
        .join(format!(
            "stay_booker_test_{}_{}_{}.sqlite3",
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos(),
            DB_COUNTER.fetch_add(1, Ordering::SeqCst)
        ))
        .to_string_lossy()
        .into_owned()
}

/// Initialize a fresh test DB (its own temp file) using the production schema
pub fn init_test_db() -> Database {
    Database::open(temp_db_path(), DEFAULT_BUSY_TIMEOUT)
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"))
}

pub fn listing(id: &str, name: &str, market: &str, property_type: &str, bedrooms: i64, price: &str) -> Listing {
    Listing {
        id: id.to_string(),
        name: name.to_string(),
        market: Some(market.to_string()),
        property_type: Some(property_type.to_string()),
        bedrooms: Some(bedrooms),
        price: price.parse::<Decimal>().unwrap(),
        description: format!("{name} in {market}"),
    }
}

/// Twelve listings across two markets, so the unfiltered sample is capped.
pub fn seed_sample_listings(db: &Database) {
    let mut listings = vec![
        listing("10006546", "Ribeira Charming Duplex", "Porto", "House", 3, "80.00"),
        listing("10009999", "Horto flat with small garden", "Rio De Janeiro", "Apartment", 1, "317.00"),
        listing("10030955", "Apt Linda Vista Lagoa", "Rio De Janeiro", "Apartment", 2, "701.50"),
    ];
    for i in 0..9 {
        listings.push(listing(
            &format!("2000000{i}"),
            &format!("Porto loft {i}"),
            "Porto",
            "Loft",
            1,
            "55.25",
        ));
    }
    save_listings(db, &listings).expect("Failed to seed listings");
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// A date `days` from today, local calendar.
pub fn days_from_today(days: i64) -> NaiveDate {
    Local::now().date_naive() + Duration::days(days)
}

pub fn draft(listing_id: &str, start: &str, end: &str) -> BookingDraft {
    BookingDraft {
        listing_id: listing_id.to_string(),
        guest_name: "Ada Lovelace".to_string(),
        stay: Stay {
            start: date(start),
            end: date(end),
        },
        contact: "ada@example.com".to_string(),
    }
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}
