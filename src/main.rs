use crate::config::Config;
use crate::db::seed::seed_listings;
use crate::db::Database;
use crate::responses::error_to_response;
use crate::router::handle;
use anyhow::{Context, Result};
use astra::Server;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Open the database and apply the schema
    let db = Database::open(config.database_path.clone(), config.busy_timeout)
        .context("Database initialization failed")?;

    if let Some(path) = &config.seed_listings {
        seed_listings(&db, path)?;
    }

    tracing::info!(
        max_workers = config.max_workers,
        "Starting server at http://{}",
        config.addr
    );

    let server = Server::bind(&config.addr).max_workers(config.max_workers);

    // Serve requests, passing a clone of the db handle into the closure
    let handler_db = db.clone();
    let result = server.serve(move |req: astra::Request, _info| {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let started = Instant::now();

        let resp = match handle(req, &handler_db) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        };

        tracing::info!(
            %method,
            %path,
            status = resp.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        resp
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "Server ended with error");
    }

    db.close().context("Failed to close database")?;
    tracing::info!("Server shut down cleanly.");
    Ok(())
}
