// src/db/seed.rs
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::db::connection::Database;
use crate::db::listings::{count_listings, save_listings};
use crate::domain::listing::Listing;

/// Load listings from a JSON array file, but only into an empty table.
/// Returns how many listings were written.
pub fn seed_listings(db: &Database, path: &Path) -> Result<usize> {
    let existing = count_listings(db).context("failed to count listings")?;
    if existing > 0 {
        tracing::info!(existing, "listings already present, skipping seed");
        return Ok(0);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let listings: Vec<Listing> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file {}", path.display()))?;

    save_listings(db, &listings).context("failed to save seed listings")?;

    tracing::info!(count = listings.len(), path = %path.display(), "seeded listings");
    Ok(listings.len())
}
