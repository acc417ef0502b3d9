// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
}

/// Final classification of a captured transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
    Adjustment,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Adjustment => "adjustment",
        }
    }

    pub fn parse(s: &str) -> Option<TransactionKind> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(TransactionKind::Expense),
            "income" => Some(TransactionKind::Income),
            "transfer" => Some(TransactionKind::Transfer),
            "adjustment" => Some(TransactionKind::Adjustment),
            _ => None,
        }
    }
}

/// Processing state of a captured raw notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawEventStatus {
    Pending,
    Processed,
    Ignored,
    Error,
}

impl RawEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawEventStatus::Pending => "pending",
            RawEventStatus::Processed => "processed",
            RawEventStatus::Ignored => "ignored",
            RawEventStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<RawEventStatus> {
        match s {
            "pending" => Some(RawEventStatus::Pending),
            "processed" => Some(RawEventStatus::Processed),
            "ignored" => Some(RawEventStatus::Ignored),
            "error" => Some(RawEventStatus::Error),
            _ => None,
        }
    }
}

/// Unmodified notification payload kept as an audit trail. Never deleted;
/// its status is resolved exactly once by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNotificationEvent {
    pub id: String,
    pub source: String,
    pub source_app: String,
    pub title: String,
    pub text: String,
    pub os_timestamp_ms: i64,
    pub status: RawEventStatus,
    pub transaction_id: Option<String>,
    pub error: Option<String>,
    pub ignore_reason: Option<String>,
    pub created_at_ms: i64,
}

/// Output of the notification parser. Ephemeral: consumed immediately by the
/// orchestrator, never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub kind: TransactionKind,
    pub raw_text: String,
}

/// A parsed transaction awaiting user disposition in the pending queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoTransaction {
    pub id: String,
    pub source_app: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub kind: TransactionKind,
    pub created_at_ms: i64,
    pub date: NaiveDate,
    pub time: String,
    pub account: Option<String>,
    /// Set when the counterparty resembles one of the user's own accounts;
    /// the item is held out of the general pending view until the user
    /// resolves the transfer-or-expense question.
    pub requires_confirmation: bool,
    pub suggested_rule_id: Option<i64>,
    pub suggested_confidence: u8,
}

/// User-approved mapping from a recognized counterparty to a transaction
/// kind (and, for transfers, an account pair). Rules never expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRule {
    pub id: i64,
    pub app_name: String,
    pub counterparty: String,
    pub kind: TransactionKind,
    pub account_from: Option<String>,
    pub account_to: Option<String>,
}

/// A row committed to the user's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub account_id: i64,
    pub to_account_id: Option<i64>,
    pub transfer_group: Option<String>,
    pub tags: Vec<String>,
}
