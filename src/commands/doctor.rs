// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::dedup;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut problems = 0usize;

    let cache_len = dedup::processed_count(conn)?;
    println!("Dedup cache: {} / {} hashes", cache_len, dedup::CAPACITY);
    if cache_len > dedup::CAPACITY {
        println!("  !! cache exceeds its bound");
        problems += 1;
    }

    // Processed raw events must link to a transaction that is still pending
    // or already in the ledger-side audit (the link itself must exist).
    let unlinked: i64 = conn.query_row(
        "SELECT COUNT(*) FROM raw_events WHERE status='processed' AND transaction_id IS NULL",
        [],
        |r| r.get(0),
    )?;
    if unlinked > 0 {
        println!("  !! {} processed raw events without a linked transaction", unlinked);
        problems += 1;
    }

    // Every transfer group must have exactly two legs summing to zero.
    let bad_groups: i64 = conn.query_row(
        "SELECT COUNT(*) FROM (
            SELECT transfer_group FROM ledger
            WHERE transfer_group IS NOT NULL
            GROUP BY transfer_group
            HAVING COUNT(*) != 2 OR ABS(SUM(CAST(amount AS REAL))) > 0.001
        )",
        [],
        |r| r.get(0),
    )?;
    if bad_groups > 0 {
        println!("  !! {} unbalanced transfer groups in the ledger", bad_groups);
        problems += 1;
    }

    let stuck: i64 = conn.query_row(
        "SELECT COUNT(*) FROM raw_events WHERE status='pending'",
        [],
        |r| r.get(0),
    )?;
    if stuck > 0 {
        println!("  .. {} raw events still pending (interrupted pipeline run?)", stuck);
    }

    let pending: i64 = conn.query_row("SELECT COUNT(*) FROM pending_transactions", [], |r| r.get(0))?;
    let transfers: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pending_transactions WHERE requires_confirmation=1",
        [],
        |r| r.get(0),
    )?;
    println!(
        "Pending queue: {} items ({} awaiting transfer confirmation)",
        pending, transfers
    );

    if problems == 0 {
        println!("All checks passed");
    }
    Ok(())
}
