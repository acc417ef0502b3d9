// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use saldo::error::ParseError;
use saldo::models::TransactionKind;
use saldo::parser::{self, normalize_amount};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn parses_unicredit_card_payment() {
    let parsed = parser::parse(
        "unicredit",
        "",
        "autorizzata op.Internet 60,40 EUR carta *1210 c/o PAYPAL *KICKKICK.IT 12/01/24",
    )
    .unwrap();
    assert_eq!(parsed.amount, dec("60.40"));
    assert_eq!(parsed.currency, "EUR");
    assert_eq!(parsed.kind, TransactionKind::Expense);
    assert_eq!(parsed.description, "PAYPAL *KICKKICK.IT");
}

#[test]
fn parses_postepay_pos_payment() {
    let parsed = parser::parse(
        "postepay",
        "",
        "Pagamento su POS 22.50 EUR presso Ristorante Roma",
    )
    .unwrap();
    assert_eq!(parsed.amount, dec("22.50"));
    assert_eq!(parsed.kind, TransactionKind::Expense);
    assert_eq!(parsed.description, "Ristorante Roma");
}

#[test]
fn parses_paypal_sent_payment_with_counterparty() {
    let parsed = parser::parse("paypal", "", "Hai inviato 50,00 EUR a Mario Rossi").unwrap();
    assert_eq!(parsed.amount, dec("50.00"));
    assert_eq!(parsed.kind, TransactionKind::Expense);
    assert_eq!(parsed.description, "Mario Rossi");
}

#[test]
fn paypal_received_is_income() {
    let parsed = parser::parse("paypal", "", "Hai ricevuto 25,00 EUR da Luigi Bianchi").unwrap();
    assert_eq!(parsed.amount, dec("25.00"));
    assert_eq!(parsed.kind, TransactionKind::Income);
    assert_eq!(parsed.description, "Luigi Bianchi");
}

#[test]
fn parses_revolut_spend_in_english() {
    let parsed = parser::parse("revolut", "", "You spent €12.30 at Starbucks").unwrap();
    assert_eq!(parsed.amount, dec("12.30"));
    assert_eq!(parsed.kind, TransactionKind::Expense);
    assert_eq!(parsed.description, "Starbucks");
}

#[test]
fn source_app_match_is_case_insensitive() {
    let parsed = parser::parse("  PayPal ", "", "Hai inviato 10,00 EUR a Mario Rossi").unwrap();
    assert_eq!(parsed.amount, dec("10.00"));
}

#[test]
fn unknown_source_app_is_rejected() {
    let err = parser::parse("fineco", "", "Pagamento di 10,00 EUR").unwrap_err();
    assert_eq!(err, ParseError::UnknownSource("fineco".to_string()));
}

#[test]
fn text_without_amount_is_rejected() {
    let err = parser::parse("unicredit", "", "Il tuo saldo e' disponibile").unwrap_err();
    assert_eq!(err, ParseError::NoAmountMatch);
}

#[test]
fn negative_amount_is_rejected() {
    let err = parser::parse("unicredit", "", "addebito di -5 EUR").unwrap_err();
    assert!(matches!(err, ParseError::InvalidAmount(_)));
}

#[test]
fn zero_amount_is_rejected() {
    let err = parser::parse("postepay", "", "Pagamento di 0 EUR").unwrap_err();
    assert!(matches!(err, ParseError::InvalidAmount(_)));
}

#[test]
fn normalize_amount_handles_both_separators() {
    assert_eq!(normalize_amount("60,40").unwrap(), dec("60.40"));
    assert_eq!(normalize_amount("22.50").unwrap(), dec("22.50"));
    assert_eq!(normalize_amount("€ 7,99").unwrap(), dec("7.99"));
    assert_eq!(normalize_amount("1000").unwrap(), dec("1000"));
}

#[test]
fn normalize_amount_rejects_garbage() {
    assert!(normalize_amount("abc").is_err());
    assert!(normalize_amount("-5").is_err());
    assert!(normalize_amount("0").is_err());
}

#[test]
fn falls_back_to_title_when_no_counterparty_matches() {
    // No presso/c-o clause anywhere, so the description comes from the
    // title minus boilerplate and the amount itself.
    let parsed = parser::parse("postepay", "Pagamento Esselunga", "Addebito di 31,07 EUR").unwrap();
    assert_eq!(parsed.description, "Esselunga");
}

#[test]
fn trailing_noise_is_stripped_from_merchant() {
    let parsed = parser::parse(
        "unicredit",
        "",
        "autorizzata transazione 15,00 EUR presso BAR CENTRALE per info o blocco carta chiama il numero verde",
    )
    .unwrap();
    assert_eq!(parsed.description, "BAR CENTRALE");
}

#[test]
fn every_bank_resolves_from_its_identifier() {
    use saldo::banks::Bank;

    assert_eq!(Bank::ALL.len(), 7);
    for bank in Bank::ALL {
        assert_eq!(Bank::from_source_app(bank.identifier()), Some(bank));
    }
}
