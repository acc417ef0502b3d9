// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use saldo::{cli, commands, db, queue};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    queue::cleanup_stale(&conn)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("banks", _)) => commands::banks::handle()?,
        Some(("ingest", sub)) => commands::ingest::handle(&mut conn, sub)?,
        Some(("pending", sub)) => commands::pending::handle(&conn, sub)?,
        Some(("confirm", sub)) => commands::confirm::handle(&mut conn, sub)?,
        Some(("ignore", sub)) => commands::ignore::handle(&conn, sub)?,
        Some(("rules", sub)) => commands::rules::handle(&conn, sub)?,
        Some(("raw", sub)) => commands::raw::handle(&conn, sub)?,
        Some(("ledger", sub)) => commands::ledger::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
