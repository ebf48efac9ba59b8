use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::ServerError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Per-thread connection slots, one per database file.
thread_local! {
    static DB_CONNS: RefCell<HashMap<String, Connection>> = RefCell::new(HashMap::new());
}

/// Storage context. Built once at startup with [`Database::open`], handed to
/// the router, and shut down with [`Database::close`].
///
/// Each worker thread lazily opens its own connection to the file; SQLite's
/// locking is the only coordination between them.
#[derive(Clone, Debug)]
pub struct Database {
    path: String,
    busy_timeout: Duration,
}

impl Database {
    /// Open the database file and apply the schema.
    pub fn open(path: impl Into<String>, busy_timeout: Duration) -> Result<Self, ServerError> {
        let db = Self {
            path: path.into(),
            busy_timeout,
        };
        db.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| ServerError::StorageUnavailable(format!("Failed to apply schema: {e}")))
        })?;
        tracing::info!(path = %db.path, "database ready");
        Ok(db)
    }

    /// Provides this thread's connection to the closure, opening it on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut slots = cell.borrow_mut();
                if !slots.contains_key(&self.path) {
                    let conn = self.connect()?;
                    slots.insert(self.path.clone(), conn);
                }
                let conn = slots
                    .get_mut(&self.path)
                    .ok_or(ServerError::InternalError)?;
                f(conn)
            })
            .map_err(|_| ServerError::InternalError)?
    }

    /// Checkpoint the WAL and drop this thread's connection.
    /// Worker threads release theirs when they exit.
    pub fn close(self) -> Result<(), ServerError> {
        self.with_conn(|conn| {
            conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
                .map_err(|e| ServerError::StorageUnavailable(format!("checkpoint failed: {e}")))
        })?;

        let conn = DB_CONNS
            .try_with(|cell| cell.borrow_mut().remove(&self.path))
            .map_err(|_| ServerError::InternalError)?;
        if let Some(conn) = conn {
            conn.close()
                .map_err(|(_, e)| ServerError::StorageUnavailable(format!("close failed: {e}")))?;
        }

        tracing::info!(path = %self.path, "database closed");
        Ok(())
    }

    fn connect(&self) -> Result<Connection, ServerError> {
        let conn = Connection::open(&self.path)
            .map_err(|e| ServerError::StorageUnavailable(format!("Open DB failed: {e}")))?;

        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| ServerError::StorageUnavailable(format!("busy_timeout failed: {e}")))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))
            .map_err(|e| ServerError::StorageUnavailable(format!("journal_mode failed: {e}")))?;

        tracing::debug!(path = %self.path, "opened connection");
        Ok(conn)
    }
}
