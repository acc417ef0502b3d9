// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use rusqlite::Connection;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::banks::Bank;
use crate::bridge::{BankNotification, NotificationBridge};
use crate::error::EngineError;
use crate::models::{AutoTransaction, TransactionKind};
use crate::rules::MatchConfidence;
use crate::{dedup, parser, queue, raw_store, rules, transfer};

/// Repeated permission checks inside this window are skipped.
pub const PERMISSION_DEBOUNCE: Duration = Duration::from_secs(2);
/// Transient permission-check failures are retried this many times with
/// linear backoff before settling on "disabled".
pub const PERMISSION_RETRIES: u32 = 3;
pub const PERMISSION_BACKOFF_BASE: Duration = Duration::from_secs(1);
/// Fallback poll of the bridge catch-up queue; the event path stays
/// authoritative.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How the pipeline resolved one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Queued for user disposition.
    Queued(String),
    /// Queued, but held in the transfer-confirmation sub-flow.
    NeedsTransferConfirmation(String),
    /// Content hash already seen; nothing re-processed.
    Duplicate,
    /// Unparsable; recorded on the raw event and not retried.
    Ignored(String),
}

/// Run one notification through the full pipeline:
/// dedup gate → raw store → parse → rule match → transfer classify → queue.
///
/// The dedup gate runs before any side-effecting work, so a redelivered
/// notification leaves no second raw event behind. Failure to persist the
/// audit copy is logged and non-fatal. The dedup cache is updated after the
/// parse attempt regardless of its outcome, so an unparsable notification
/// is not retried on every redelivery.
pub fn process_notification(
    conn: &mut Connection,
    notification: &BankNotification,
) -> Result<PipelineOutcome> {
    let hash = dedup::content_hash(
        &notification.source_app,
        &notification.title,
        &notification.text,
    );
    if !dedup::should_process(conn, &hash)? {
        return Ok(PipelineOutcome::Duplicate);
    }

    let raw_id = match raw_store::save(conn, notification) {
        Ok(id) => Some(id),
        Err(e) => {
            let e = EngineError::Persistence(e);
            eprintln!("warning: failed to persist raw notification: {e}");
            None
        }
    };

    let parsed = parser::parse(
        &notification.source_app,
        &notification.title,
        &notification.text,
    );
    dedup::mark_processed(conn, &hash)?;

    let parsed = match parsed {
        Ok(p) => p,
        Err(e) => {
            let reason = e.to_string();
            if let Some(id) = &raw_id {
                raw_store::mark_ignored(conn, id, &reason)?;
            }
            return Ok(PipelineOutcome::Ignored(reason));
        }
    };

    let source_app = notification.source_app.trim().to_lowercase();
    let account = Bank::from_source_app(&source_app).map(|b| b.display_name().to_string());

    // The parser's kind is a heuristic; an exact rule overrides it. A
    // partial match only rides along as a suggestion.
    let (rule, confidence) = rules::match_rule(conn, &source_app, &parsed.raw_text)?;
    let mut kind = parsed.kind;
    let mut suggested_rule_id = None;
    let suggested_confidence = confidence.score();
    if let Some(rule) = rule {
        suggested_rule_id = Some(rule.id);
        if confidence == MatchConfidence::Exact {
            kind = rule.kind;
        }
    }

    // Transfers always pass through the human confirmation sub-flow, whether
    // flagged by an exact rule or by the counterparty resembling one of the
    // user's own accounts.
    let requires_confirmation = match kind {
        TransactionKind::Transfer => true,
        TransactionKind::Expense => {
            transfer::detect_transfer_candidate(conn, &parsed.description, account.as_deref())?
                .is_some()
        }
        _ => false,
    };

    let created_at_ms = notification.timestamp_ms;
    let dt = Utc
        .timestamp_millis_opt(created_at_ms)
        .single()
        .unwrap_or_else(Utc::now);

    let tx = AutoTransaction {
        id: Uuid::new_v4().to_string(),
        source_app,
        description: parsed.description,
        amount: parsed.amount,
        currency: parsed.currency,
        kind,
        created_at_ms,
        date: dt.date_naive(),
        time: dt.format("%H:%M").to_string(),
        account,
        requires_confirmation,
        suggested_rule_id,
        suggested_confidence,
    };
    if let Err(e) = queue::add(conn, &tx) {
        if let Some(id) = &raw_id {
            raw_store::mark_error(conn, id, &format!("{e:#}"))?;
        }
        return Err(e);
    }

    if let Some(id) = &raw_id {
        raw_store::mark_processed(conn, id, &tx.id)?;
    }

    Ok(if requires_confirmation {
        PipelineOutcome::NeedsTransferConfirmation(tx.id)
    } else {
        PipelineOutcome::Queued(tx.id)
    })
}

#[derive(Debug)]
struct PermissionState {
    enabled: bool,
    last_check: Option<Instant>,
    in_flight: bool,
}

/// Top-level coordinator: owns the DB connection and bridge, consumes the
/// notification channel one message at a time, and falls back to polling
/// the bridge catch-up queue when the channel stays quiet.
pub struct Orchestrator<B: NotificationBridge> {
    conn: Connection,
    bridge: B,
    rx: Option<Receiver<BankNotification>>,
    listening: bool,
    permission: PermissionState,
    debounce_window: Duration,
    backoff_base: Duration,
    poll_interval: Duration,
}

impl<B: NotificationBridge> Orchestrator<B> {
    pub fn new(conn: Connection, bridge: B, rx: Receiver<BankNotification>) -> Self {
        Orchestrator {
            conn,
            bridge,
            rx: Some(rx),
            listening: false,
            permission: PermissionState {
                enabled: false,
                last_check: None,
                in_flight: false,
            },
            debounce_window: PERMISSION_DEBOUNCE,
            backoff_base: PERMISSION_BACKOFF_BASE,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Shrink the debounce window, retry backoff, and poll interval.
    pub fn with_timings(
        mut self,
        debounce_window: Duration,
        backoff_base: Duration,
        poll_interval: Duration,
    ) -> Self {
        self.debounce_window = debounce_window;
        self.backoff_base = backoff_base;
        self.poll_interval = poll_interval;
        self
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Debounced permission check: a check already in flight suppresses
    /// re-entry, repeats inside the debounce window reuse the last answer,
    /// and transient bridge failures are retried with linear backoff before
    /// the safe "disabled" default wins.
    pub fn check_permission(&mut self) -> bool {
        if self.permission.in_flight {
            return self.permission.enabled;
        }
        if let Some(at) = self.permission.last_check {
            if at.elapsed() < self.debounce_window {
                return self.permission.enabled;
            }
        }

        self.permission.in_flight = true;
        let mut enabled = false;
        for attempt in 0..=PERMISSION_RETRIES {
            match self.bridge.is_enabled() {
                Ok(v) => {
                    enabled = v;
                    break;
                }
                Err(_) if attempt < PERMISSION_RETRIES => {
                    thread::sleep(self.backoff_base * (attempt + 1));
                }
                Err(_) => {
                    // All retries exhausted: degrade to disabled rather than
                    // mistake a transient bridge error for a revocation.
                    enabled = false;
                }
            }
        }
        self.permission.enabled = enabled;
        self.permission.last_check = Some(Instant::now());
        self.permission.in_flight = false;
        enabled
    }

    /// Ask the platform for notification access. A denial is surfaced as
    /// `PermissionDenied` so the caller can show a capability toggle.
    pub fn request_access(&mut self) -> Result<()> {
        if self.bridge.request_permission()? {
            self.permission.enabled = true;
            self.permission.last_check = Some(Instant::now());
            Ok(())
        } else {
            Err(EngineError::PermissionDenied.into())
        }
    }

    /// Start or stop consuming bridge events based on the current
    /// permission state. Losing permission stops consumption without
    /// touching already-queued items. Starting to listen sweeps pending
    /// items that sat unconfirmed past the retention window.
    pub fn ensure_listening(&mut self) -> Result<bool> {
        if self.check_permission() {
            if !self.listening {
                queue::cleanup_stale(&self.conn)?;
                self.bridge.start_listening()?;
                self.listening = true;
            }
        } else {
            self.listening = false;
        }
        Ok(self.listening)
    }

    /// Wait up to one poll interval for a channel message; process
    /// everything queued behind it. On timeout, drain the bridge catch-up
    /// queue instead (resilience against missed events, not correctness).
    pub fn run_once(&mut self) -> Result<Vec<PipelineOutcome>> {
        if !self.listening {
            return Ok(Vec::new());
        }
        let Some(rx) = self.rx.as_ref() else {
            return Ok(Vec::new());
        };

        let mut batch = Vec::new();
        match rx.recv_timeout(self.poll_interval) {
            Ok(n) => {
                batch.push(n);
                while let Ok(n) = rx.try_recv() {
                    batch.push(n);
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                batch = self.bridge.get_pending_notifications().unwrap_or_default();
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.listening = false;
                return Ok(Vec::new());
            }
        }

        let mut outcomes = Vec::with_capacity(batch.len());
        for n in &batch {
            outcomes.push(process_notification(&mut self.conn, n)?);
        }
        Ok(outcomes)
    }

    /// Tear down the consumer loop: the receiver is dropped so no timer or
    /// listener leaks across reconnect cycles.
    pub fn shutdown(&mut self) {
        self.listening = false;
        self.rx = None;
    }
}
