// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.saldo", "Saldo", "saldo"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("saldo.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- Audit trail of captured notifications. Append-only: rows are never
    -- deleted, only their status is resolved by the orchestrator.
    CREATE TABLE IF NOT EXISTS raw_events(
        id TEXT PRIMARY KEY,
        source TEXT NOT NULL DEFAULT 'notification',
        source_app TEXT NOT NULL,
        title TEXT NOT NULL,
        text TEXT NOT NULL,
        os_timestamp_ms INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK(status IN ('pending','processed','ignored','error')),
        transaction_id TEXT,
        error TEXT,
        ignore_reason TEXT,
        created_at_ms INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_raw_events_status ON raw_events(status);

    -- Parsed transactions awaiting user confirm/ignore disposition.
    CREATE TABLE IF NOT EXISTS pending_transactions(
        id TEXT PRIMARY KEY,
        source_app TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('expense','income','transfer','adjustment')),
        created_at_ms INTEGER NOT NULL,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        account TEXT,
        requires_confirmation INTEGER NOT NULL DEFAULT 0,
        suggested_rule_id INTEGER,
        suggested_confidence INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS rules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        app_name TEXT NOT NULL,
        counterparty TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('expense','income','transfer','adjustment')),
        account_from TEXT,
        account_to TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS ledger(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('expense','income','transfer','adjustment')),
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        date TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        to_account_id INTEGER,
        transfer_group TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE,
        FOREIGN KEY(to_account_id) REFERENCES accounts(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_ledger_date ON ledger(date);
    "#,
    )?;
    Ok(())
}
