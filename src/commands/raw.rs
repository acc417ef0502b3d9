// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::models::RawEventStatus;
use crate::raw_store;
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let status = match m.get_one::<String>("status") {
        Some(raw) => Some(
            RawEventStatus::parse(raw.trim())
                .ok_or_else(|| anyhow!("Invalid status '{}'", raw))?,
        ),
        None => None,
    };

    let rows: Vec<Vec<String>> = raw_store::list(conn, status)?
        .into_iter()
        .map(|e| {
            vec![
                e.id,
                e.source_app,
                e.title,
                e.status.as_str().to_string(),
                e.transaction_id.unwrap_or_default(),
                e.ignore_reason.or(e.error).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "App", "Title", "Status", "Transaction", "Reason"], rows)
    );
    Ok(())
}
