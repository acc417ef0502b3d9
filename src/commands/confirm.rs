// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::error::EngineError;
use crate::models::TransactionKind;
use crate::queue::{self, Disposition};
use crate::utils::{default_account_for, id_for_account};
use crate::{rules, transfer};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let id = m.get_one::<String>("id").unwrap().trim().to_string();
    let Some(item) = queue::get(conn, &id)? else {
        // Already confirmed or ignored; repeating the call is a no-op.
        println!("No pending transaction '{}'", id);
        return Ok(());
    };

    let kind = match m.get_one::<String>("kind") {
        Some(raw) => {
            TransactionKind::parse(raw).ok_or_else(|| anyhow!("Invalid kind '{}'", raw))?
        }
        None => item.kind,
    };

    let mut rule_from: Option<String> = None;
    let mut rule_to: Option<String> = None;
    if let Some(rule_id) = item.suggested_rule_id {
        if item.suggested_confidence == 100 {
            if let Some(rule) = rules::list(conn, None)?.into_iter().find(|r| r.id == rule_id) {
                rule_from = rule.account_from;
                rule_to = rule.account_to;
            }
        }
    }

    let (account_from_name, account_to_name) = match kind {
        TransactionKind::Transfer => {
            let from = m
                .get_one::<String>("from")
                .map(|s| s.trim().to_string())
                .or(rule_from);
            let to = m
                .get_one::<String>("to")
                .map(|s| s.trim().to_string())
                .or(rule_to);
            let (Some(from), Some(to)) = (from, to) else {
                return Err(EngineError::TransferAccountsInvalid(
                    "both --from and --to accounts must be selected".into(),
                )
                .into());
            };
            if from.is_empty() || to.is_empty() {
                return Err(EngineError::TransferAccountsInvalid(
                    "account selections must not be empty".into(),
                )
                .into());
            }
            let from_id = id_for_account(conn, &from)?;
            let to_id = id_for_account(conn, &to)?;

            let done = if item.requires_confirmation {
                transfer::confirm_as_transfer(conn, &id, from_id, to_id)?
            } else {
                queue::confirm(
                    conn,
                    &id,
                    &Disposition {
                        kind: TransactionKind::Transfer,
                        account_id: from_id,
                        to_account_id: Some(to_id),
                        tags: vec!["transfer".to_string()],
                    },
                )?
            };
            if done {
                println!("Transfer recorded: {} -> {}", from, to);
            }
            (Some(from), Some(to))
        }
        _ => {
            let account_id = match m.get_one::<String>("account") {
                Some(name) => id_for_account(conn, name.trim())?,
                None => default_account_for(conn, &item.source_app)?
                    .ok_or_else(|| anyhow!("No accounts configured; add one with 'saldo account add'"))?
                    .id,
            };

            let done = if item.requires_confirmation && kind == TransactionKind::Expense {
                transfer::confirm_as_expense(conn, &id, account_id)?
            } else {
                queue::confirm(
                    conn,
                    &id,
                    &Disposition {
                        kind,
                        account_id,
                        to_account_id: None,
                        tags: Vec::new(),
                    },
                )?
            };
            if done {
                println!(
                    "Recorded {} {} '{}' ({})",
                    item.amount,
                    item.currency,
                    item.description,
                    kind.as_str()
                );
            }
            (None, None)
        }
    };

    if m.get_flag("save_rule") {
        let rule_id = rules::save(
            conn,
            &item.source_app,
            &item.description,
            kind,
            account_from_name.as_deref(),
            account_to_name.as_deref(),
        )?;
        println!(
            "Saved rule {}: '{}' -> {}",
            rule_id,
            item.description,
            kind.as_str()
        );
    }
    Ok(())
}
