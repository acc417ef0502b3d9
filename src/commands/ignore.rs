// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::queue;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let id = m.get_one::<String>("id").unwrap().trim();
    if queue::ignore(conn, id)? {
        println!("Ignored pending transaction {}", id);
    } else {
        println!("No pending transaction '{}'", id);
    }
    Ok(())
}
