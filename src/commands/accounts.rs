// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{add_account, list_accounts, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let id = add_account(conn, name)?;
            println!("Added account '{}' (id {})", name, id);
        }
        Some(("list", _)) => {
            let rows = list_accounts(conn)?
                .into_iter()
                .map(|a| vec![a.id.to_string(), a.name])
                .collect();
            println!("{}", pretty_table(&["ID", "Name"], rows));
        }
        _ => {}
    }
    Ok(())
}
