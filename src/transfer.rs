// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::error::EngineError;
use crate::models::{Account, TransactionKind};
use crate::queue::{self, Disposition};
use crate::utils::{account_name, list_accounts};

/// If the counterparty of a parsed expense resembles one of the user's own
/// accounts, the money may have moved between accounts rather than to a
/// merchant. Returns the resembled account; the notification's own source
/// account never counts as evidence.
pub fn detect_transfer_candidate(
    conn: &Connection,
    counterparty: &str,
    source_account: Option<&str>,
) -> Result<Option<Account>> {
    let haystack = counterparty.to_lowercase();
    for account in list_accounts(conn)? {
        let name = account.name.to_lowercase();
        if name.is_empty() {
            continue;
        }
        if let Some(src) = source_account {
            if src.to_lowercase() == name {
                continue;
            }
        }
        if haystack.contains(&name) {
            return Ok(Some(account));
        }
    }
    Ok(None)
}

/// Resolve a suspended item as an inter-account transfer. Produces the two
/// linked ledger legs and removes the item, atomically.
pub fn confirm_as_transfer(
    conn: &mut Connection,
    id: &str,
    from_account_id: i64,
    to_account_id: i64,
) -> Result<bool> {
    if from_account_id == to_account_id {
        return Err(EngineError::TransferAccountsInvalid(
            "source and destination accounts must differ".into(),
        )
        .into());
    }
    // Both selections must resolve to real accounts before anything commits.
    account_name(conn, from_account_id)?;
    account_name(conn, to_account_id)?;

    queue::confirm(
        conn,
        id,
        &Disposition {
            kind: TransactionKind::Transfer,
            account_id: from_account_id,
            to_account_id: Some(to_account_id),
            tags: vec!["transfer".to_string()],
        },
    )
}

/// Discard the transfer hypothesis and commit as a normal expense against
/// the source account.
pub fn confirm_as_expense(conn: &mut Connection, id: &str, account_id: i64) -> Result<bool> {
    queue::confirm(
        conn,
        id,
        &Disposition {
            kind: TransactionKind::Expense,
            account_id,
            to_account_id: None,
            tags: Vec::new(),
        },
    )
}
