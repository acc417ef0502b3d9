// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{AutoTransaction, LedgerEntry, TransactionKind};
use crate::queue::Disposition;
use crate::utils::account_name;

/// The single entry point the engine uses to reach the user's ledger.
///
/// Expenses are recorded with a negative amount, income with a positive one.
/// A transfer writes a debit and a matching credit row linked by a shared
/// `transfer_group`, so the two legs always move equal and opposite amounts.
pub fn add_transaction(
    conn: &Connection,
    kind: TransactionKind,
    amount: Decimal,
    description: &str,
    date: NaiveDate,
    account_id: i64,
    to_account_id: Option<i64>,
    tags: &[String],
) -> Result<()> {
    let tags_json = serde_json::to_string(tags)?;
    match kind {
        TransactionKind::Transfer => {
            let to = to_account_id.ok_or_else(|| {
                EngineError::TransferAccountsInvalid("destination account missing".into())
            })?;
            if to == account_id {
                return Err(EngineError::TransferAccountsInvalid(
                    "source and destination accounts must differ".into(),
                )
                .into());
            }
            let group = Uuid::new_v4().to_string();
            let to_name = account_name(conn, to)?;
            let from_name = account_name(conn, account_id)?;
            conn.execute(
                "INSERT INTO ledger(kind, amount, description, date, account_id, to_account_id, transfer_group, tags)
                 VALUES ('transfer', ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    (-amount).to_string(),
                    format!("Trasferimento → {}", to_name),
                    date.to_string(),
                    account_id,
                    to,
                    group,
                    tags_json
                ],
            )?;
            conn.execute(
                "INSERT INTO ledger(kind, amount, description, date, account_id, to_account_id, transfer_group, tags)
                 VALUES ('transfer', ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    amount.to_string(),
                    format!("Trasferimento ← {}", from_name),
                    date.to_string(),
                    to,
                    account_id,
                    group,
                    tags_json
                ],
            )?;
        }
        TransactionKind::Expense => {
            conn.execute(
                "INSERT INTO ledger(kind, amount, description, date, account_id, tags)
                 VALUES ('expense', ?1, ?2, ?3, ?4, ?5)",
                params![(-amount).to_string(), description, date.to_string(), account_id, tags_json],
            )?;
        }
        TransactionKind::Income | TransactionKind::Adjustment => {
            conn.execute(
                "INSERT INTO ledger(kind, amount, description, date, account_id, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    kind.as_str(),
                    amount.to_string(),
                    description,
                    date.to_string(),
                    account_id,
                    tags_json
                ],
            )?;
        }
    }
    Ok(())
}

/// Commit a pending item under the user's chosen disposition. Runs inside
/// the caller's sqlite transaction together with the queue removal.
pub fn commit_pending(
    conn: &Connection,
    pending: &AutoTransaction,
    disposition: &Disposition,
) -> Result<()> {
    let mut tags = vec!["auto-rilevata".to_string(), pending.source_app.clone()];
    tags.extend(disposition.tags.iter().cloned());
    add_transaction(
        conn,
        disposition.kind,
        pending.amount,
        &pending.description,
        pending.date,
        disposition.account_id,
        disposition.to_account_id,
        &tags,
    )
}

pub fn list(conn: &Connection) -> Result<Vec<LedgerEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, amount, description, date, account_id, to_account_id, transfer_group, tags
         FROM ledger ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind_raw: String = r.get(1)?;
        let amount_raw: String = r.get(2)?;
        let date_raw: String = r.get(4)?;
        let tags_raw: String = r.get(8)?;
        out.push(LedgerEntry {
            id: r.get(0)?,
            kind: TransactionKind::parse(&kind_raw).unwrap_or(TransactionKind::Expense),
            amount: amount_raw.parse::<Decimal>().unwrap_or(Decimal::ZERO),
            description: r.get(3)?,
            date: date_raw.parse().unwrap_or_default(),
            account_id: r.get(5)?,
            to_account_id: r.get(6)?,
            transfer_group: r.get(7)?,
            tags: serde_json::from_str(&tags_raw).unwrap_or_default(),
        });
    }
    Ok(out)
}
