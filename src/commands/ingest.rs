// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;

use crate::bridge::BankNotification;
use crate::orchestrator::{PipelineOutcome, process_notification};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let notification = BankNotification {
        source_app: m.get_one::<String>("app").unwrap().trim().to_string(),
        title: m.get_one::<String>("title").unwrap().to_string(),
        text: m.get_one::<String>("text").unwrap().to_string(),
        timestamp_ms: match m.get_one::<String>("timestamp") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid timestamp '{}'", raw))?,
            None => Utc::now().timestamp_millis(),
        },
    };

    match process_notification(conn, &notification)? {
        PipelineOutcome::Queued(id) => {
            println!("Queued pending transaction {}", id);
        }
        PipelineOutcome::NeedsTransferConfirmation(id) => {
            println!(
                "Queued {} - looks like a transfer between your accounts, confirm with \
                 'saldo confirm --id {} --kind transfer --from ... --to ...' or --kind expense",
                id, id
            );
        }
        PipelineOutcome::Duplicate => {
            println!("Duplicate notification, skipped");
        }
        PipelineOutcome::Ignored(reason) => {
            println!("Notification ignored: {}", reason);
        }
    }
    Ok(())
}
