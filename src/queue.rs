// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::ledger;
use crate::models::{AutoTransaction, TransactionKind};

/// Pending items older than this are swept on startup.
pub const MAX_AGE_DAYS: i64 = 30;

/// What the user decided for a pending item. For a transfer both accounts
/// are required and must differ; validation happens at commit time.
#[derive(Debug, Clone)]
pub struct Disposition {
    pub kind: TransactionKind,
    pub account_id: i64,
    pub to_account_id: Option<i64>,
    pub tags: Vec<String>,
}

pub fn add(conn: &Connection, tx: &AutoTransaction) -> Result<()> {
    conn.execute(
        "INSERT INTO pending_transactions(id, source_app, description, amount, currency, kind,
             created_at_ms, date, time, account, requires_confirmation,
             suggested_rule_id, suggested_confidence)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13)",
        params![
            tx.id,
            tx.source_app,
            tx.description,
            tx.amount.to_string(),
            tx.currency,
            tx.kind.as_str(),
            tx.created_at_ms,
            tx.date.to_string(),
            tx.time,
            tx.account,
            tx.requires_confirmation as i64,
            tx.suggested_rule_id,
            tx.suggested_confidence as i64
        ],
    )?;
    Ok(())
}

/// Items awaiting disposition, newest first. An item suspended in the
/// transfer-confirmation sub-flow is excluded so the two review surfaces
/// never claim the same transaction.
pub fn get_pending(conn: &Connection) -> Result<Vec<AutoTransaction>> {
    query(
        conn,
        "SELECT id, source_app, description, amount, currency, kind, created_at_ms,
                date, time, account, requires_confirmation, suggested_rule_id, suggested_confidence
         FROM pending_transactions WHERE requires_confirmation=0
         ORDER BY created_at_ms DESC",
    )
}

/// Items waiting on the transfer-or-expense question.
pub fn get_awaiting_transfer_confirmation(conn: &Connection) -> Result<Vec<AutoTransaction>> {
    query(
        conn,
        "SELECT id, source_app, description, amount, currency, kind, created_at_ms,
                date, time, account, requires_confirmation, suggested_rule_id, suggested_confidence
         FROM pending_transactions WHERE requires_confirmation=1
         ORDER BY created_at_ms DESC",
    )
}

pub fn get_all(conn: &Connection) -> Result<Vec<AutoTransaction>> {
    query(
        conn,
        "SELECT id, source_app, description, amount, currency, kind, created_at_ms,
                date, time, account, requires_confirmation, suggested_rule_id, suggested_confidence
         FROM pending_transactions ORDER BY created_at_ms DESC",
    )
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<AutoTransaction>> {
    let tx = conn
        .query_row(
            "SELECT id, source_app, description, amount, currency, kind, created_at_ms,
                    date, time, account, requires_confirmation, suggested_rule_id, suggested_confidence
             FROM pending_transactions WHERE id=?1",
            params![id],
            row_to_tx,
        )
        .optional()?;
    Ok(tx)
}

/// Confirm a pending item: commit it to the ledger and remove it from the
/// queue as one sqlite transaction, so a failed ledger write leaves the item
/// pending instead of losing it. Confirming an id that is no longer queued
/// is a no-op.
pub fn confirm(conn: &mut Connection, id: &str, disposition: &Disposition) -> Result<bool> {
    let Some(pending) = get(conn, id)? else {
        return Ok(false);
    };

    let sqltx = conn.transaction()?;
    ledger::commit_pending(&sqltx, &pending, disposition)?;
    sqltx.execute("DELETE FROM pending_transactions WHERE id=?1", params![id])?;
    sqltx.commit()?;
    Ok(true)
}

/// Remove an item with no ledger effect. Calling twice with the same id is a
/// no-op the second time, never an error.
pub fn ignore(conn: &Connection, id: &str) -> Result<bool> {
    let n = conn.execute("DELETE FROM pending_transactions WHERE id=?1", params![id])?;
    Ok(n > 0)
}

/// Sweep items that sat unconfirmed for more than `MAX_AGE_DAYS`.
pub fn cleanup_stale(conn: &Connection) -> Result<usize> {
    let cutoff = Utc::now().timestamp_millis() - MAX_AGE_DAYS * 24 * 60 * 60 * 1000;
    let n = conn.execute(
        "DELETE FROM pending_transactions WHERE created_at_ms < ?1",
        params![cutoff],
    )?;
    Ok(n)
}

fn query(conn: &Connection, sql: &str) -> Result<Vec<AutoTransaction>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_tx(r)?);
    }
    Ok(out)
}

fn row_to_tx(r: &rusqlite::Row<'_>) -> rusqlite::Result<AutoTransaction> {
    let amount_raw: String = r.get(3)?;
    let kind_raw: String = r.get(5)?;
    let date_raw: String = r.get(7)?;
    Ok(AutoTransaction {
        id: r.get(0)?,
        source_app: r.get(1)?,
        description: r.get(2)?,
        amount: amount_raw.parse::<Decimal>().unwrap_or(Decimal::ZERO),
        currency: r.get(4)?,
        kind: TransactionKind::parse(&kind_raw).unwrap_or(TransactionKind::Expense),
        created_at_ms: r.get(6)?,
        date: date_raw.parse().unwrap_or_default(),
        time: r.get(8)?,
        account: r.get(9)?,
        requires_confirmation: r.get::<_, i64>(10)? != 0,
        suggested_rule_id: r.get(11)?,
        suggested_confidence: r.get::<_, i64>(12)? as u8,
    })
}
