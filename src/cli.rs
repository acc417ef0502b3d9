// Copyright (c) 2025 Saldo Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("saldo")
        .about("Notification-driven transaction capture and reconciliation")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("account")
                .about("Manage the accounts transfers are matched against")
                .subcommand(
                    Command::new("add").about("Add an account").arg(
                        Arg::new("name")
                            .long("name")
                            .required(true)
                            .help("Account name"),
                    ),
                )
                .subcommand(Command::new("list").about("List accounts")),
        )
        .subcommand(Command::new("banks").about("List supported banking apps"))
        .subcommand(
            Command::new("ingest")
                .about("Run one banking-app notification through the pipeline")
                .arg(
                    Arg::new("app")
                        .long("app")
                        .required(true)
                        .help("Source app identifier (e.g. unicredit, paypal)"),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .default_value("")
                        .help("Notification title"),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .required(true)
                        .help("Notification body text"),
                )
                .arg(
                    Arg::new("timestamp")
                        .long("timestamp")
                        .help("OS delivery timestamp (ms since epoch; defaults to now)"),
                ),
        )
        .subcommand(json_flags(
            Command::new("pending")
                .about("List transactions awaiting disposition")
                .arg(
                    Arg::new("transfers")
                        .long("transfers")
                        .action(ArgAction::SetTrue)
                        .help("Show items held for transfer confirmation instead"),
                ),
        ))
        .subcommand(
            Command::new("confirm")
                .about("Confirm a pending transaction into the ledger")
                .arg(Arg::new("id").long("id").required(true).help("Pending id"))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .help("Final kind: expense, income, or transfer"),
                )
                .arg(
                    Arg::new("account")
                        .long("account")
                        .help("Account name (expense/income)"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source account name (transfer)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Destination account name (transfer)"),
                )
                .arg(
                    Arg::new("save_rule")
                        .long("save-rule")
                        .action(ArgAction::SetTrue)
                        .help("Remember this counterparty -> kind mapping"),
                ),
        )
        .subcommand(
            Command::new("ignore")
                .about("Discard a pending transaction with no ledger effect")
                .arg(Arg::new("id").long("id").required(true).help("Pending id")),
        )
        .subcommand(
            Command::new("rules")
                .about("Saved classification rules")
                .subcommand(
                    Command::new("list")
                        .about("List rules")
                        .arg(Arg::new("app").long("app").help("Filter by source app")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a rule")
                        .arg(Arg::new("id").long("id").required(true).help("Rule id")),
                ),
        )
        .subcommand(
            Command::new("raw")
                .about("Audit trail of captured notifications")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Filter: pending, processed, ignored, error"),
                ),
        )
        .subcommand(json_flags(
            Command::new("ledger").about("List committed ledger entries"),
        ))
        .subcommand(Command::new("doctor").about("Check engine invariants"))
}
