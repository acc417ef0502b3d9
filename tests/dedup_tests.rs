// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;

use saldo::bridge::BankNotification;
use saldo::orchestrator::{PipelineOutcome, process_notification};
use saldo::{db, dedup, queue, raw_store};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn hash_ignores_delivery_timestamp_and_app_case() {
    let a = dedup::content_hash("PayPal", "PayPal", "Hai inviato 50,00 EUR a Mario Rossi");
    let b = dedup::content_hash("paypal", "PayPal", "Hai inviato 50,00 EUR a Mario Rossi");
    assert_eq!(a, b);

    let c = dedup::content_hash("paypal", "PayPal", "Hai inviato 51,00 EUR a Mario Rossi");
    assert_ne!(a, c);
}

#[test]
fn marking_a_hash_makes_it_ineligible() {
    let conn = setup();
    let hash = dedup::content_hash("revolut", "Revolut", "You spent €5.00 at Bar");
    assert!(dedup::should_process(&conn, &hash).unwrap());

    dedup::mark_processed(&conn, &hash).unwrap();
    assert!(!dedup::should_process(&conn, &hash).unwrap());

    // Marking again is harmless and does not grow the cache.
    dedup::mark_processed(&conn, &hash).unwrap();
    assert_eq!(dedup::processed_count(&conn).unwrap(), 1);
}

#[test]
fn cache_is_bounded_and_evicts_oldest_first() {
    let conn = setup();
    let hashes: Vec<String> = (0..150)
        .map(|i| dedup::content_hash("revolut", "Revolut", &format!("You spent €{i}.00 at Bar")))
        .collect();
    for h in &hashes {
        dedup::mark_processed(&conn, h).unwrap();
    }

    assert_eq!(dedup::processed_count(&conn).unwrap(), dedup::CAPACITY);
    // The first 50 were evicted; the most recent 100 are still blocked.
    assert!(dedup::should_process(&conn, &hashes[0]).unwrap());
    assert!(dedup::should_process(&conn, &hashes[49]).unwrap());
    assert!(!dedup::should_process(&conn, &hashes[50]).unwrap());
    assert!(!dedup::should_process(&conn, &hashes[149]).unwrap());
}

#[test]
fn redelivered_notification_is_processed_once() {
    let mut conn = setup();
    let first = BankNotification {
        source_app: "paypal".into(),
        title: "PayPal".into(),
        text: "Hai inviato 50,00 EUR a Mario Rossi".into(),
        timestamp_ms: 1_700_000_000_000,
    };
    // Same content, fresh delivery timestamp.
    let redelivered = BankNotification {
        timestamp_ms: 1_700_000_060_000,
        ..first.clone()
    };

    let out1 = process_notification(&mut conn, &first).unwrap();
    assert!(matches!(out1, PipelineOutcome::Queued(_)));
    let out2 = process_notification(&mut conn, &redelivered).unwrap();
    assert_eq!(out2, PipelineOutcome::Duplicate);

    assert_eq!(queue::get_all(&conn).unwrap().len(), 1);
    assert_eq!(raw_store::list(&conn, None).unwrap().len(), 1);
}

#[test]
fn unparsable_notification_is_not_retried() {
    let mut conn = setup();
    let n = BankNotification {
        source_app: "unicredit".into(),
        title: "UniCredit".into(),
        text: "Il tuo estratto conto e' disponibile".into(),
        timestamp_ms: 1_700_000_000_000,
    };

    let out1 = process_notification(&mut conn, &n).unwrap();
    assert!(matches!(out1, PipelineOutcome::Ignored(_)));
    // The parse attempt marked the hash, so redelivery short-circuits.
    let out2 = process_notification(&mut conn, &n).unwrap();
    assert_eq!(out2, PipelineOutcome::Duplicate);
    assert_eq!(raw_store::list(&conn, None).unwrap().len(), 1);
}
