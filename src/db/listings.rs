use crate::db::connection::Database;
use crate::domain::listing::{Listing, ListingDetail, ListingFilter, ListingSummary};
use crate::errors::ServerError;
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Prices are stored as decimal strings so no precision is lost.
fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(raw.trim())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Search listings.
/// - No filter: a random sample of [`ListingFilter::SAMPLE_SIZE`] listings.
/// - Otherwise: every listing matching all the given facets.
pub fn search_listings(
    db: &Database,
    filter: &ListingFilter,
) -> Result<Vec<ListingSummary>, ServerError> {
    let mut sql = String::from("SELECT id, name, price FROM listings");
    let mut args: Vec<&dyn ToSql> = Vec::new();

    if filter.is_empty() {
        sql.push_str(&format!(
            " ORDER BY RANDOM() LIMIT {}",
            ListingFilter::SAMPLE_SIZE
        ));
    } else {
        let mut clauses = Vec::new();
        if let Some(market) = &filter.market {
            clauses.push("market = ?");
            args.push(market);
        }
        if let Some(property_type) = &filter.property_type {
            clauses.push("property_type = ?");
            args.push(property_type);
        }
        if let Some(bedrooms) = &filter.bedrooms {
            clauses.push("bedrooms = ?");
            args.push(bedrooms);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        sql.push_str(" ORDER BY name");
    }

    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ServerError::StorageUnavailable(format!("prepare search failed: {e}")))?;

        let rows = stmt
            .query_map(args.as_slice(), |row| {
                Ok(ListingSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    price: decimal_at(row, 2)?,
                })
            })
            .map_err(|e| ServerError::StorageUnavailable(format!("search failed: {e}")))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| ServerError::StorageUnavailable(e.to_string()))?);
        }
        Ok(out)
    })
}

pub fn get_listing(db: &Database, id: &str) -> Result<ListingDetail, ServerError> {
    db.with_conn(|conn| {
        conn.query_row(
            "SELECT id, name, price, description FROM listings WHERE id = ?",
            params![id],
            |row| {
                Ok(ListingDetail {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    price: decimal_at(row, 2)?,
                    description: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::StorageUnavailable(format!("listing lookup failed: {e}")))?
        .ok_or(ServerError::NotFound("Listing"))
    })
}

/// Distinct non-empty markets, sorted.
pub fn distinct_markets(db: &Database) -> Result<Vec<String>, ServerError> {
    distinct_values(
        db,
        "SELECT DISTINCT market FROM listings WHERE market IS NOT NULL AND market <> '' ORDER BY market",
    )
}

/// Distinct non-empty property types, sorted.
pub fn distinct_property_types(db: &Database) -> Result<Vec<String>, ServerError> {
    distinct_values(
        db,
        "SELECT DISTINCT property_type FROM listings WHERE property_type IS NOT NULL AND property_type <> '' ORDER BY property_type",
    )
}

fn distinct_values(db: &Database, sql: &str) -> Result<Vec<String>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| ServerError::StorageUnavailable(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| ServerError::StorageUnavailable(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| ServerError::StorageUnavailable(e.to_string()))?);
        }
        Ok(out)
    })
}

pub fn count_listings(db: &Database) -> Result<i64, ServerError> {
    db.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM listings", [], |r| r.get(0))
            .map_err(|e| ServerError::StorageUnavailable(format!("count listings failed: {e}")))
    })
}

/// Insert or replace listings in one transaction.
pub fn save_listings(db: &Database, listings: &[Listing]) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| ServerError::StorageUnavailable(e.to_string()))?;

        for listing in listings {
            tx.execute(
                r#"
                INSERT INTO listings (id, name, market, property_type, bedrooms, price, description)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    market = excluded.market,
                    property_type = excluded.property_type,
                    bedrooms = excluded.bedrooms,
                    price = excluded.price,
                    description = excluded.description
                "#,
                params![
                    listing.id,
                    listing.name,
                    listing.market,
                    listing.property_type,
                    listing.bedrooms,
                    listing.price.to_string(),
                    listing.description,
                ],
            )
            .map_err(|e| ServerError::StorageUnavailable(format!("save listing failed: {e}")))?;
        }

        tx.commit()
            .map_err(|e| ServerError::StorageUnavailable(e.to_string()))?;

        Ok(())
    })
}
