// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::queue;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let data = if m.get_flag("transfers") {
        queue::get_awaiting_transfer_confirmation(conn)?
    } else {
        queue::get_pending(conn)?
    };

    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.source_app.clone(),
                    t.description.clone(),
                    format!("{} {}", t.amount, t.currency),
                    t.kind.as_str().to_string(),
                    t.date.to_string(),
                    match t.suggested_confidence {
                        0 => String::new(),
                        c => format!("rule {} ({}%)", t.suggested_rule_id.unwrap_or(0), c),
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "App", "Description", "Amount", "Kind", "Date", "Suggestion"],
                rows,
            )
        );
    }
    Ok(())
}
