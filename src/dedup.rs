// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

/// Most recent content hashes kept; insertion beyond capacity evicts the
/// oldest entry.
pub const CAPACITY: usize = 100;

const STORAGE_KEY: &str = "processed_raw_notifications";

/// 128-bit content hash over `source_app|title|text`. The delivery timestamp
/// is deliberately excluded: the OS may redeliver an identical notification
/// with a fresh timestamp.
pub fn content_hash(source_app: &str, title: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source_app.trim().to_lowercase().as_bytes());
    hasher.update(b"|");
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

pub fn should_process(conn: &Connection, hash: &str) -> Result<bool> {
    let seen = load(conn)?;
    Ok(!seen.iter().any(|h| h == hash))
}

pub fn mark_processed(conn: &Connection, hash: &str) -> Result<()> {
    let mut seen = load(conn)?;
    if seen.iter().any(|h| h == hash) {
        return Ok(());
    }
    seen.push_back(hash.to_string());
    while seen.len() > CAPACITY {
        seen.pop_front();
    }
    save(conn, &seen)
}

pub fn processed_count(conn: &Connection) -> Result<usize> {
    Ok(load(conn)?.len())
}

fn load(conn: &Connection) -> Result<VecDeque<String>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![STORAGE_KEY],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(json) => {
            serde_json::from_str(&json).context("Corrupt processed-notification cache")
        }
        None => Ok(VecDeque::new()),
    }
}

fn save(conn: &Connection, seen: &VecDeque<String>) -> Result<()> {
    let json = serde_json::to_string(seen)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![STORAGE_KEY, json],
    )?;
    Ok(())
}
