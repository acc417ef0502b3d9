// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, channel};

/// One banking-app notification as delivered by the OS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankNotification {
    pub source_app: String,
    pub title: String,
    pub text: String,
    pub timestamp_ms: i64,
}

/// Platform notification access, modeled as a message channel: the native
/// side pushes `BankNotification`s through a `Sender` while the
/// orchestrator consumes them one at a time, which preserves the
/// single-threaded processing guarantee without callback nesting.
pub trait NotificationBridge {
    /// Whether the OS-level notification access permission is granted.
    /// May fail transiently (native bridge hiccup); callers retry.
    fn is_enabled(&mut self) -> Result<bool>;

    /// Ask the OS for permission. Typically opens a settings screen; the
    /// updated state is observed on the next `is_enabled` check.
    fn request_permission(&mut self) -> Result<bool>;

    /// Start delivering notifications into the channel.
    fn start_listening(&mut self) -> Result<()>;

    /// Catch-up queue: notifications that arrived while nobody listened.
    fn get_pending_notifications(&mut self) -> Result<Vec<BankNotification>>;
}

pub fn notification_channel() -> (Sender<BankNotification>, Receiver<BankNotification>) {
    channel()
}

/// Bridge for environments without notification access (CLI ingest, tests
/// that drive the pipeline directly).
#[derive(Debug, Default)]
pub struct NullBridge;

impl NotificationBridge for NullBridge {
    fn is_enabled(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn request_permission(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn start_listening(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_pending_notifications(&mut self) -> Result<Vec<BankNotification>> {
        Ok(Vec::new())
    }
}
