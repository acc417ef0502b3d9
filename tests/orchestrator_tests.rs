// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use saldo::models::{AutoTransaction, TransactionKind};

use saldo::bridge::{BankNotification, NotificationBridge, NullBridge, notification_channel};
use saldo::db;
use saldo::error::EngineError;
use saldo::orchestrator::{Orchestrator, PipelineOutcome};
use saldo::queue;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn paypal_notification(text: &str) -> BankNotification {
    BankNotification {
        source_app: "paypal".into(),
        title: "PayPal".into(),
        text: text.into(),
        timestamp_ms: 1_705_057_200_000,
    }
}

/// Bridge whose permission answers follow a script; once the script runs
/// out it settles on `default_enabled`.
struct ScriptedBridge {
    script: VecDeque<Result<bool>>,
    default_enabled: bool,
    checks: Rc<Cell<u32>>,
    started: Rc<Cell<bool>>,
    catch_up: Vec<BankNotification>,
}

impl ScriptedBridge {
    fn enabled() -> Self {
        ScriptedBridge {
            script: VecDeque::new(),
            default_enabled: true,
            checks: Rc::new(Cell::new(0)),
            started: Rc::new(Cell::new(false)),
            catch_up: Vec::new(),
        }
    }

    fn with_script(script: Vec<Result<bool>>) -> Self {
        ScriptedBridge {
            script: script.into_iter().collect(),
            ..ScriptedBridge::enabled()
        }
    }
}

impl NotificationBridge for ScriptedBridge {
    fn is_enabled(&mut self) -> Result<bool> {
        self.checks.set(self.checks.get() + 1);
        match self.script.pop_front() {
            Some(answer) => answer,
            None => Ok(self.default_enabled),
        }
    }

    fn request_permission(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn start_listening(&mut self) -> Result<()> {
        self.started.set(true);
        Ok(())
    }

    fn get_pending_notifications(&mut self) -> Result<Vec<BankNotification>> {
        Ok(std::mem::take(&mut self.catch_up))
    }
}

fn fast(orch: Orchestrator<ScriptedBridge>) -> Orchestrator<ScriptedBridge> {
    orch.with_timings(Duration::ZERO, Duration::ZERO, Duration::from_millis(10))
}

#[test]
fn transient_permission_failures_are_retried() {
    let bridge = ScriptedBridge::with_script(vec![
        Err(anyhow!("bridge hiccup")),
        Err(anyhow!("bridge hiccup")),
        Ok(true),
    ]);
    let checks = bridge.checks.clone();
    let (_tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(orch.check_permission());
    assert_eq!(checks.get(), 3);
}

#[test]
fn exhausted_retries_settle_on_disabled() {
    let bridge = ScriptedBridge::with_script(vec![
        Err(anyhow!("down")),
        Err(anyhow!("down")),
        Err(anyhow!("down")),
        Err(anyhow!("down")),
    ]);
    let checks = bridge.checks.clone();
    let (_tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(!orch.check_permission());
    // Initial attempt plus three retries.
    assert_eq!(checks.get(), 4);
    assert!(!orch.ensure_listening().unwrap());
}

#[test]
fn permission_checks_are_debounced() {
    let bridge = ScriptedBridge::with_script(vec![Ok(true), Ok(false)]);
    let checks = bridge.checks.clone();
    let (_tx, rx) = notification_channel();
    let mut orch = Orchestrator::new(setup(), bridge, rx)
        .with_timings(Duration::from_secs(60), Duration::ZERO, Duration::from_millis(10));

    assert!(orch.check_permission());
    // Inside the debounce window the cached answer is reused.
    assert!(orch.check_permission());
    assert_eq!(checks.get(), 1);
}

#[test]
fn zero_debounce_rechecks_every_time() {
    let bridge = ScriptedBridge::with_script(vec![Ok(true), Ok(false)]);
    let checks = bridge.checks.clone();
    let (_tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(orch.check_permission());
    assert!(!orch.check_permission());
    assert_eq!(checks.get(), 2);
}

#[test]
fn channel_messages_are_processed_in_order() {
    let bridge = ScriptedBridge::enabled();
    let started = bridge.started.clone();
    let (tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(orch.ensure_listening().unwrap());
    assert!(started.get());
    assert!(orch.is_listening());

    tx.send(paypal_notification("Hai inviato 50,00 EUR a Mario Rossi"))
        .unwrap();
    tx.send(paypal_notification("Hai inviato 12,00 EUR a Luigi Bianchi"))
        .unwrap();

    let outcomes = orch.run_once().unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| matches!(o, PipelineOutcome::Queued(_))));
    assert_eq!(queue::get_all(orch.conn()).unwrap().len(), 2);
}

#[test]
fn quiet_channel_falls_back_to_polling() {
    let mut bridge = ScriptedBridge::enabled();
    bridge.catch_up = vec![paypal_notification("Hai inviato 50,00 EUR a Mario Rossi")];
    let (_tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(orch.ensure_listening().unwrap());
    // Nothing on the channel: after the poll interval the bridge catch-up
    // queue is drained instead.
    let outcomes = orch.run_once().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], PipelineOutcome::Queued(_)));
    assert_eq!(queue::get_all(orch.conn()).unwrap().len(), 1);
}

#[test]
fn without_permission_nothing_is_consumed() {
    let bridge = ScriptedBridge {
        default_enabled: false,
        ..ScriptedBridge::enabled()
    };
    let started = bridge.started.clone();
    let (tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(!orch.ensure_listening().unwrap());
    assert!(!started.get());

    tx.send(paypal_notification("Hai inviato 50,00 EUR a Mario Rossi"))
        .unwrap();
    assert!(orch.run_once().unwrap().is_empty());
    assert!(queue::get_all(orch.conn()).unwrap().is_empty());
}

#[test]
fn null_bridge_denies_access_and_never_listens() {
    let (_tx, rx) = notification_channel();
    let mut orch = Orchestrator::new(setup(), NullBridge, rx)
        .with_timings(Duration::ZERO, Duration::ZERO, Duration::from_millis(10));

    let err = orch.request_access().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::PermissionDenied)
    ));
    assert!(!orch.ensure_listening().unwrap());
    assert!(orch.run_once().unwrap().is_empty());
}

#[test]
fn granted_access_enables_listening() {
    let bridge = ScriptedBridge::with_script(vec![Ok(false)]);
    let (_tx, rx) = notification_channel();
    let mut orch = Orchestrator::new(setup(), bridge, rx)
        .with_timings(Duration::from_secs(60), Duration::ZERO, Duration::from_millis(10));

    // A grant refreshes the cached permission state, so the scripted
    // "disabled" answer is never consulted inside the debounce window.
    orch.request_access().unwrap();
    assert!(orch.ensure_listening().unwrap());
}

#[test]
fn disconnected_channel_stops_the_listener() {
    let bridge = ScriptedBridge::enabled();
    let (tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(orch.ensure_listening().unwrap());
    drop(tx);
    assert!(orch.run_once().unwrap().is_empty());
    assert!(!orch.is_listening());
}

fn pending_item(id: &str, created_at_ms: i64) -> AutoTransaction {
    AutoTransaction {
        id: id.to_string(),
        source_app: "revolut".to_string(),
        description: "Starbucks".to_string(),
        amount: "12.30".parse().unwrap(),
        currency: "EUR".to_string(),
        kind: TransactionKind::Expense,
        created_at_ms,
        date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        time: "09:15".to_string(),
        account: None,
        requires_confirmation: false,
        suggested_rule_id: None,
        suggested_confidence: 0,
    }
}

#[test]
fn stale_items_are_swept_when_listening_starts() {
    let conn = setup();
    let now = Utc::now().timestamp_millis();
    let stale_ms = now - (queue::MAX_AGE_DAYS + 1) * 24 * 60 * 60 * 1000;
    queue::add(&conn, &pending_item("old", stale_ms)).unwrap();
    queue::add(&conn, &pending_item("fresh", now)).unwrap();

    let (_tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(conn, ScriptedBridge::enabled(), rx));
    assert!(orch.ensure_listening().unwrap());

    let left = queue::get_all(orch.conn()).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, "fresh");
}

#[test]
fn shutdown_releases_the_receiver() {
    let bridge = ScriptedBridge::enabled();
    let (tx, rx) = notification_channel();
    let mut orch = fast(Orchestrator::new(setup(), bridge, rx));

    assert!(orch.ensure_listening().unwrap());
    orch.shutdown();
    assert!(!orch.is_listening());

    // The receiver is gone, so the sender observes the hang-up.
    assert!(tx.send(paypal_notification("Hai inviato 1,00 EUR a Mario Rossi")).is_err());
    assert!(orch.run_once().unwrap().is_empty());
}
