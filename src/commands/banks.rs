// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::banks::Bank;
use crate::utils::pretty_table;

pub fn handle() -> Result<()> {
    let rows = Bank::ALL
        .iter()
        .map(|b| vec![b.identifier().to_string(), b.display_name().to_string()])
        .collect();
    println!("{}", pretty_table(&["Identifier", "Name"], rows));
    Ok(())
}
