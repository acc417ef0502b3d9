// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::banks::Bank;
use crate::error::ParseError;
use crate::models::{ParsedTransaction, TransactionKind};

pub const DEFAULT_CURRENCY: &str = "EUR";
const FALLBACK_DESCRIPTION: &str = "Transazione";

/// Turn a raw banking-app notification into a typed transaction.
///
/// Pattern selection is by exact case-insensitive `source_app` key, so the
/// result is independent of the order banks are declared in.
pub fn parse(source_app: &str, title: &str, text: &str) -> Result<ParsedTransaction, ParseError> {
    let bank = Bank::from_source_app(source_app)
        .ok_or_else(|| ParseError::UnknownSource(source_app.trim().to_lowercase()))?;

    let full_text = format!("{} {}", title, text).trim().to_string();

    let raw_amount = bank
        .amount_re()
        .captures(&full_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::NoAmountMatch)?;
    let amount = normalize_amount(&raw_amount)?;

    let description = extract_description(bank, &full_text, title, &raw_amount);

    let kind = if bank.is_expense(&full_text.to_lowercase()) {
        TransactionKind::Expense
    } else {
        TransactionKind::Income
    };

    Ok(ParsedTransaction {
        amount,
        currency: DEFAULT_CURRENCY.to_string(),
        description,
        kind,
        raw_text: full_text,
    })
}

/// Strip currency symbols, map a comma decimal separator to a dot, and
/// require a strictly positive decimal.
pub fn normalize_amount(raw: &str) -> Result<Decimal, ParseError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();
    let cleaned = cleaned
        .trim_start_matches("EUR")
        .trim_end_matches("EUR")
        .replace(',', ".");

    let amount = cleaned
        .parse::<Decimal>()
        .map_err(|_| ParseError::InvalidAmount(raw.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(ParseError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

fn extract_description(bank: Bank, full_text: &str, title: &str, raw_amount: &str) -> String {
    if let Some(caps) = bank.counterparty_re().captures(full_text) {
        // Alternation patterns carry several capture groups; the first
        // non-empty one is the counterparty.
        let captured = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str())
            .find(|s| !s.trim().is_empty());
        if let Some(name) = captured {
            let cleaned = clean_merchant_name(name);
            if !cleaned.is_empty() {
                return cleaned;
            }
        }
    }

    let fallback = strip_boilerplate(title, raw_amount);
    if fallback.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        fallback
    }
}

static TRAILING_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+\d{2}/\d{2}/\d{2,4}.*$").unwrap());
static TRAILING_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+\d{2}:\d{2}.*$").unwrap());
static INFO_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*per\s+info.*$").unwrap());
static CARD_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+\d+\**").unwrap());

/// Remove the trailing noise banking apps append to merchant names:
/// dates, times, masked card numbers, "Per info o blocco carta..." tails.
pub fn clean_merchant_name(merchant: &str) -> String {
    let mut cleaned = merchant.trim().to_string();
    cleaned = TRAILING_DATE.replace(&cleaned, "").into_owned();
    cleaned = TRAILING_TIME.replace(&cleaned, "").into_owned();
    cleaned = INFO_TAIL.replace(&cleaned, "").into_owned();
    let without_cards = CARD_NUMBER.replace_all(&cleaned, "").into_owned();
    // A merchant that was only a card reference keeps the raw capture.
    let trimmed = without_cards.trim();
    if trimmed.is_empty() {
        cleaned.trim().to_string()
    } else {
        trimmed.to_string()
    }
}

fn strip_boilerplate(title: &str, raw_amount: &str) -> String {
    let mut out = String::new();
    for word in title.split_whitespace() {
        let lower = word.to_lowercase();
        if lower == "pagamento" || lower == "spesa" || word.contains(raw_amount) {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.trim().to_string()
}
