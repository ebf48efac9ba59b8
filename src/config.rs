use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::connection::DEFAULT_BUSY_TIMEOUT;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_path: String,
    pub max_workers: usize,
    pub busy_timeout: Duration,
    /// JSON array of listings loaded into an empty database at startup.
    pub seed_listings: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid number")?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("HOST must be an IP address, got {host:?}"))?;

        Ok(Self {
            addr,
            database_path: lookup("DB_PATH").unwrap_or_else(|| "bookings.sqlite3".to_string()),
            max_workers: lookup("MAX_WORKERS")
                .unwrap_or_else(|| "8".to_string())
                .parse()
                .context("MAX_WORKERS must be a valid number")?,
            busy_timeout: match lookup("DB_BUSY_TIMEOUT_MS") {
                Some(ms) => Duration::from_millis(
                    ms.parse()
                        .context("DB_BUSY_TIMEOUT_MS must be a valid number")?,
                ),
                None => DEFAULT_BUSY_TIMEOUT,
            },
            seed_listings: lookup("SEED_LISTINGS")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        })
    }
}
