// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{Connection, params};

use crate::models::{SavedRule, TransactionKind};

/// Strength of a rule match. Banking apps truncate and reorder merchant
/// names, so an exact-substring hit and a surname-only hit carry different
/// weight: only an exact match may auto-apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchConfidence {
    Exact,
    Partial,
    None,
}

impl MatchConfidence {
    pub fn score(&self) -> u8 {
        match self {
            MatchConfidence::Exact => 100,
            MatchConfidence::Partial => 75,
            MatchConfidence::None => 0,
        }
    }
}

/// Lowercase, trim, and collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The stored counterparty appears verbatim inside the new text.
pub fn exact_match(counterparty: &str, text: &str) -> bool {
    let needle = normalize(counterparty);
    !needle.is_empty() && normalize(text).contains(&needle)
}

/// Multi-token counterparty whose last token (the "surname") is longer than
/// three characters and appears in the new text.
pub fn surname_match(counterparty: &str, text: &str) -> bool {
    let needle = normalize(counterparty);
    let tokens: Vec<&str> = needle.split(' ').collect();
    if tokens.len() < 2 {
        return false;
    }
    let surname = tokens[tokens.len() - 1];
    surname.len() > 3 && normalize(text).contains(surname)
}

pub fn confidence(counterparty: &str, text: &str) -> MatchConfidence {
    if exact_match(counterparty, text) {
        MatchConfidence::Exact
    } else if surname_match(counterparty, text) {
        MatchConfidence::Partial
    } else {
        MatchConfidence::None
    }
}

/// Match a new notification against the saved rules for `app_name`. Returns
/// the strongest match; ties go to the older rule.
pub fn match_rule(
    conn: &Connection,
    app_name: &str,
    text: &str,
) -> Result<(Option<SavedRule>, MatchConfidence)> {
    let mut best: Option<(SavedRule, MatchConfidence)> = None;
    for rule in list(conn, Some(app_name))? {
        let c = confidence(&rule.counterparty, text);
        if c == MatchConfidence::None {
            continue;
        }
        let stronger = match &best {
            None => true,
            Some((_, existing)) => c.score() > existing.score(),
        };
        if stronger {
            let is_exact = c == MatchConfidence::Exact;
            best = Some((rule, c));
            if is_exact {
                break;
            }
        }
    }
    Ok(match best {
        Some((rule, c)) => (Some(rule), c),
        None => (None, MatchConfidence::None),
    })
}

pub fn save(
    conn: &Connection,
    app_name: &str,
    counterparty: &str,
    kind: TransactionKind,
    account_from: Option<&str>,
    account_to: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO rules(app_name, counterparty, kind, account_from, account_to)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            app_name.trim().to_lowercase(),
            normalize(counterparty),
            kind.as_str(),
            account_from,
            account_to
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list(conn: &Connection, app_name: Option<&str>) -> Result<Vec<SavedRule>> {
    let mut out = Vec::new();
    let mut push_row = |r: &rusqlite::Row<'_>| -> rusqlite::Result<()> {
        let kind_raw: String = r.get(3)?;
        out.push(SavedRule {
            id: r.get(0)?,
            app_name: r.get(1)?,
            counterparty: r.get(2)?,
            kind: TransactionKind::parse(&kind_raw).unwrap_or(TransactionKind::Expense),
            account_from: r.get(4)?,
            account_to: r.get(5)?,
        });
        Ok(())
    };
    match app_name {
        Some(app) => {
            let mut stmt = conn.prepare(
                "SELECT id, app_name, counterparty, kind, account_from, account_to
                 FROM rules WHERE app_name=?1 ORDER BY id",
            )?;
            let mut rows = stmt.query(params![app.trim().to_lowercase()])?;
            while let Some(r) = rows.next()? {
                push_row(r)?;
            }
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, app_name, counterparty, kind, account_from, account_to
                 FROM rules ORDER BY id",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(r) = rows.next()? {
                push_row(r)?;
            }
        }
    }
    Ok(out)
}

pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
    Ok(n > 0)
}
