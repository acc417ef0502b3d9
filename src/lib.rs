// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod banks;
pub mod bridge;
pub mod cli;
pub mod commands;
pub mod db;
pub mod dedup;
pub mod error;
pub mod ledger;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod queue;
pub mod raw_store;
pub mod rules;
pub mod transfer;
pub mod utils;
