// src/db/bookings.rs
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};

use crate::db::connection::Database;
use crate::domain::booking::{Booking, BookingDraft, Stay};
use crate::domain::booking_id::BookingId;
use crate::errors::ServerError;

/// Persist a validated booking unless it overlaps an existing one.
///
/// The overlap check and the insert share one `BEGIN IMMEDIATE` transaction:
/// SQLite hands out the write lock at `BEGIN`, so a second writer waits for
/// the first to finish and then sees its row. Any early return drops the
/// transaction, which rolls it back.
pub fn create_booking(db: &Database, draft: &BookingDraft) -> Result<BookingId, ServerError> {
    let now = Utc::now();
    let id = BookingId::generate(now.timestamp());
    let created_at = now.naive_utc();

    db.with_conn(|conn| {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| ServerError::StorageUnavailable(format!("begin booking tx failed: {e}")))?;

        if let Some(existing) = find_overlap(&tx, &draft.listing_id, &draft.stay)? {
            tracing::warn!(
                listing_id = %draft.listing_id,
                start = %draft.stay.start,
                end = %draft.stay.end,
                existing_start = %existing.start,
                existing_end = %existing.end,
                "booking conflict"
            );
            return Err(ServerError::Conflict {
                existing_start: existing.start,
                existing_end: existing.end,
            });
        }

        tx.execute(
            r#"
            INSERT INTO bookings (id, listing_id, guest_name, start_date, end_date, contact, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                id.to_string(),
                draft.listing_id,
                draft.guest_name,
                draft.stay.start,
                draft.stay.end,
                draft.contact,
                created_at,
            ],
        )
        .map_err(|e| ServerError::StorageUnavailable(format!("insert booking failed: {e}")))?;

        tx.commit()
            .map_err(|e| ServerError::StorageUnavailable(format!("commit booking failed: {e}")))?;

        Ok(())
    })?;

    tracing::info!(
        booking_id = %id,
        listing_id = %draft.listing_id,
        start = %draft.stay.start,
        end = %draft.stay.end,
        "booking created"
    );
    Ok(id)
}

/// First stored stay on `listing_id` that intersects `stay` (half-open),
/// mirroring [`Stay::overlaps`].
fn find_overlap(
    tx: &Transaction<'_>,
    listing_id: &str,
    stay: &Stay,
) -> Result<Option<Stay>, ServerError> {
    tx.query_row(
        r#"
        SELECT start_date, end_date
        FROM bookings
        WHERE listing_id = ?1
          AND start_date < ?2
          AND end_date > ?3
        ORDER BY start_date
        LIMIT 1
        "#,
        params![listing_id, stay.end, stay.start],
        |row| {
            Ok(Stay {
                start: row.get(0)?,
                end: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::StorageUnavailable(format!("overlap check failed: {e}")))
}

pub fn get_booking(db: &Database, id: &BookingId) -> Result<Booking, ServerError> {
    db.with_conn(|conn| {
        conn.query_row(
            r#"
            SELECT listing_id, guest_name, start_date, end_date, contact, created_at
            FROM bookings
            WHERE id = ?
            "#,
            params![id.to_string()],
            |row| {
                Ok(Booking {
                    id: *id,
                    listing_id: row.get(0)?,
                    guest_name: row.get(1)?,
                    start_date: row.get(2)?,
                    end_date: row.get(3)?,
                    contact: row.get(4)?,
                    created_at: row.get::<_, NaiveDateTime>(5)?,
                })
            },
        )
        .optional()
        .map_err(|e| ServerError::StorageUnavailable(format!("booking lookup failed: {e}")))?
        .ok_or(ServerError::NotFound("Booking"))
    })
}
