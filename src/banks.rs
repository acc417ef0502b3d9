// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;

/// Closed set of supported banking apps. Each variant carries the field
/// extraction patterns for that app's notification text, so an unknown
/// source app is handled up front and adding a bank is a compile-time
/// exhaustiveness concern rather than a lookup-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Revolut,
    PayPal,
    Postepay,
    Bbva,
    Intesa,
    Bnl,
    UniCredit,
}

impl Bank {
    pub const ALL: [Bank; 7] = [
        Bank::Revolut,
        Bank::PayPal,
        Bank::Postepay,
        Bank::Bbva,
        Bank::Intesa,
        Bank::Bnl,
        Bank::UniCredit,
    ];

    /// Exact source-app key, matched case-insensitively. Selection does not
    /// depend on the order of `ALL`.
    pub fn from_source_app(app: &str) -> Option<Bank> {
        let norm = app.trim().to_lowercase();
        Bank::ALL.iter().copied().find(|b| b.identifier() == norm)
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Bank::Revolut => "revolut",
            Bank::PayPal => "paypal",
            Bank::Postepay => "postepay",
            Bank::Bbva => "bbva",
            Bank::Intesa => "intesa",
            Bank::Bnl => "bnl",
            Bank::UniCredit => "unicredit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Bank::Revolut => "Revolut",
            Bank::PayPal => "PayPal",
            Bank::Postepay => "Postepay",
            Bank::Bbva => "BBVA",
            Bank::Intesa => "Intesa Sanpaolo",
            Bank::Bnl => "BNL",
            Bank::UniCredit => "UniCredit",
        }
    }

    /// Amount capture: a transaction keyword, then the first decimal number,
    /// optionally wrapped in a € / EUR marker. The sign is captured so that
    /// negative amounts are rejected later instead of silently truncated.
    pub fn amount_re(&self) -> &'static Regex {
        match self {
            Bank::Revolut => &REVOLUT_AMOUNT,
            Bank::PayPal => &PAYPAL_AMOUNT,
            Bank::Postepay => &POSTEPAY_AMOUNT,
            Bank::Bbva => &BBVA_AMOUNT,
            Bank::Intesa => &INTESA_AMOUNT,
            Bank::Bnl => &BNL_AMOUNT,
            Bank::UniCredit => &UNICREDIT_AMOUNT,
        }
    }

    /// Counterparty / merchant capture, applied after the amount matched.
    pub fn counterparty_re(&self) -> &'static Regex {
        match self {
            Bank::Revolut => &REVOLUT_COUNTERPARTY,
            Bank::PayPal => &PAYPAL_COUNTERPARTY,
            Bank::Postepay => &POSTEPAY_COUNTERPARTY,
            Bank::Bbva => &BBVA_COUNTERPARTY,
            Bank::Intesa => &INTESA_COUNTERPARTY,
            Bank::Bnl => &BNL_COUNTERPARTY,
            Bank::UniCredit => &UNICREDIT_COUNTERPARTY,
        }
    }

    /// Per-bank expense heuristic over the lowercased full text. Absence of
    /// every expense keyword classifies the notification as income; the
    /// result is re-checked against saved rules before reaching the user.
    pub fn is_expense(&self, full_text_lower: &str) -> bool {
        let keywords: &[&str] = match self {
            Bank::Revolut => &["you spent", "hai speso", "payment", "pagamento"],
            Bank::PayPal => &["you sent", "hai inviato", "pagamento"],
            Bank::Postepay => &["pagamento", "addebito", "autorizzazione"],
            Bank::Bbva => &["compra", "pago", "cargo", "acquisto"],
            Bank::Intesa => &["addebito", "pagamento", "pos"],
            Bank::Bnl => &["pagamento", "prelievo", "addebito"],
            Bank::UniCredit => &["autorizzata", "addebito", "pagamento", "transazione"],
        };
        keywords.iter().any(|k| full_text_lower.contains(k))
    }
}

const NUM: &str = r"(-?\d+(?:[.,]\d{1,2})?)";

fn amount_pattern(keywords: &str) -> String {
    format!(r"(?i)(?:{keywords}).*?€?\s*{NUM}\s*(?:eur|€)?")
}

static REVOLUT_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"you\s+spent|hai\s+speso|payment|pagamento|you\s+received|hai\s+ricevuto|received|accredito|transfer|trasferimento|bonifico",
    ))
    .unwrap()
});

static PAYPAL_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"you\s+sent|hai\s+inviato|pagamento|you\s+received|hai\s+ricevuto",
    ))
    .unwrap()
});

static POSTEPAY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"pagamento|addebito|autorizzazione|accredito|ricarica|bonifico",
    ))
    .unwrap()
});

static BBVA_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"compra|pago|cargo|acquisto|ingreso|abono|entrata|transferencia",
    ))
    .unwrap()
});

static INTESA_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"addebito|pagamento|pos|accredito|bonifico",
    ))
    .unwrap()
});

static BNL_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"pagamento|prelievo|addebito|accredito",
    ))
    .unwrap()
});

static UNICREDIT_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&amount_pattern(
        r"autorizzata|addebito|pagamento|transazione|accredito|bonifico",
    ))
    .unwrap()
});

static REVOLUT_COUNTERPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:at|presso|in|to|from|da)\s+(.+)").unwrap());

static PAYPAL_COUNTERPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:to|a|from|da)\s+(.+)").unwrap());

static POSTEPAY_COUNTERPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:presso|at|verso)\s+(.+)|c/o\s+(.+)").unwrap());

static BBVA_COUNTERPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:en|a)\s+(.+)|c/o\s+(.+)").unwrap());

static INTESA_COUNTERPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:presso|a|favore)\s+(.+)|c/o\s+(.+)").unwrap());

static BNL_COUNTERPARTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bpresso\s+(.+)|c/o\s+(.+)").unwrap());

// UniCredit card notifications put a reference number, the date, or a "Per
// info" tail right after the merchant.
static UNICREDIT_COUNTERPARTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:c/o|presso|at)\s+(.+?)(?:\s+\d{2}/\d{2}/\d{2,4}|\s+per\s+info|$)").unwrap()
});
