// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// A notification that could not be turned into a transaction. These are
/// expected noise from irrelevant notifications: the pipeline records the
/// reason on the raw event and moves on without surfacing an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no bank pattern for source app '{0}'")]
    UnknownSource(String),
    #[error("no amount found in notification text")]
    NoAmountMatch,
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),
    #[error("notification access permission denied")]
    PermissionDenied,
    #[error("invalid transfer accounts: {0}")]
    TransferAccountsInvalid(String),
}
