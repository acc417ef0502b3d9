// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::rules;
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let app = sub.get_one::<String>("app").map(|s| s.as_str());
            let rows: Vec<Vec<String>> = rules::list(conn, app)?
                .into_iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.app_name,
                        r.counterparty,
                        r.kind.as_str().to_string(),
                        r.account_from.unwrap_or_default(),
                        r.account_to.unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "App", "Counterparty", "Kind", "From", "To"], rows)
            );
        }
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("id").unwrap();
            let id = raw.trim().parse::<i64>()?;
            if rules::delete(conn, id)? {
                println!("Removed rule {}", id);
            } else {
                println!("No rule {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}
