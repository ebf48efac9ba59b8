use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable unit. Reference data: this service only reads it
/// (and loads it once from a seed file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,

    // Search facets
    pub market: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i64>,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
}

/// One row of a search result.
#[derive(Debug, Serialize)]
pub struct ListingSummary {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
}

/// What the listing detail page needs.
#[derive(Debug, Serialize)]
pub struct ListingDetail {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    pub description: String,
}

/// Search filters. Empty strings from a submitted form count as absent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListingFilter {
    pub market: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i64>,
}

impl ListingFilter {
    /// Number of listings returned when no filter is given.
    pub const SAMPLE_SIZE: usize = 10;

    pub fn is_empty(&self) -> bool {
        self.market.is_none() && self.property_type.is_none() && self.bedrooms.is_none()
    }
}
