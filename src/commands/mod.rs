// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod banks;
pub mod ingest;
pub mod pending;
pub mod confirm;
pub mod ignore;
pub mod rules;
pub mod raw;
pub mod ledger;
pub mod doctor;
