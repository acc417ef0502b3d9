// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::bridge::BankNotification;
use crate::models::{RawEventStatus, RawNotificationEvent};

/// Persist the unmodified notification payload before any parsing, so the
/// original text survives for audit and re-parsing.
pub fn save(conn: &Connection, notification: &BankNotification) -> rusqlite::Result<String> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO raw_events(id, source, source_app, title, text, os_timestamp_ms, status, created_at_ms)
         VALUES (?1, 'notification', ?2, ?3, ?4, ?5, 'pending', ?6)",
        params![
            id,
            notification.source_app,
            notification.title,
            notification.text,
            notification.timestamp_ms,
            Utc::now().timestamp_millis()
        ],
    )?;
    Ok(id)
}

pub fn mark_processed(conn: &Connection, id: &str, transaction_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE raw_events SET status='processed', transaction_id=?2 WHERE id=?1",
        params![id, transaction_id],
    )?;
    Ok(())
}

pub fn mark_ignored(conn: &Connection, id: &str, reason: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE raw_events SET status='ignored', ignore_reason=?2 WHERE id=?1",
        params![id, reason],
    )?;
    Ok(())
}

pub fn mark_error(conn: &Connection, id: &str, error: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE raw_events SET status='error', error=?2 WHERE id=?1",
        params![id, error],
    )?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawNotificationEvent>> {
    let event = conn
        .query_row(
            "SELECT id, source, source_app, title, text, os_timestamp_ms, status,
                    transaction_id, error, ignore_reason, created_at_ms
             FROM raw_events WHERE id=?1",
            params![id],
            row_to_event,
        )
        .optional()?;
    Ok(event)
}

pub fn list(conn: &Connection, status: Option<RawEventStatus>) -> rusqlite::Result<Vec<RawNotificationEvent>> {
    let mut out = Vec::new();
    match status {
        Some(s) => {
            let mut stmt = conn.prepare(
                "SELECT id, source, source_app, title, text, os_timestamp_ms, status,
                        transaction_id, error, ignore_reason, created_at_ms
                 FROM raw_events WHERE status=?1 ORDER BY created_at_ms DESC",
            )?;
            let mut rows = stmt.query(params![s.as_str()])?;
            while let Some(r) = rows.next()? {
                out.push(row_to_event(r)?);
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, source, source_app, title, text, os_timestamp_ms, status,
                        transaction_id, error, ignore_reason, created_at_ms
                 FROM raw_events ORDER BY created_at_ms DESC",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(r) = rows.next()? {
                out.push(row_to_event(r)?);
            }
        }
    }
    Ok(out)
}

fn row_to_event(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawNotificationEvent> {
    let status_raw: String = r.get(6)?;
    Ok(RawNotificationEvent {
        id: r.get(0)?,
        source: r.get(1)?,
        source_app: r.get(2)?,
        title: r.get(3)?,
        text: r.get(4)?,
        os_timestamp_ms: r.get(5)?,
        status: RawEventStatus::parse(&status_raw).unwrap_or(RawEventStatus::Error),
        transaction_id: r.get(7)?,
        error: r.get(8)?,
        ignore_reason: r.get(9)?,
        created_at_ms: r.get(10)?,
    })
}
