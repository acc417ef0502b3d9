// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};

use crate::models::Account;

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn add_account(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts(name) VALUES (?1)",
        params![name.trim()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name FROM accounts ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Account {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn id_for_account(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name))?;
    Ok(id)
}

pub fn account_name(conn: &Connection, id: i64) -> Result<String> {
    let mut stmt = conn.prepare("SELECT name FROM accounts WHERE id=?1")?;
    let name: String = stmt
        .query_row(params![id], |r| r.get(0))
        .with_context(|| format!("Account id {} not found", id))?;
    Ok(name)
}

/// Default account for a confirmed item: the first account whose name
/// contains the notification's source app, else the first account.
pub fn default_account_for(conn: &Connection, source_app: &str) -> Result<Option<Account>> {
    let accounts = list_accounts(conn)?;
    let needle = source_app.trim().to_lowercase();
    let matching = accounts
        .iter()
        .find(|a| a.name.to_lowercase().contains(&needle))
        .cloned();
    Ok(matching.or_else(|| accounts.first().cloned()))
}
