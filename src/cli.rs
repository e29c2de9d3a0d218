// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("YYYY-MM-DD (default: today)")
}

fn tx_fields(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("kind")
            .long("kind")
            .required(true)
            .help("income | expense"),
    )
    .arg(Arg::new("amount").long("amount").required(true))
    .arg(Arg::new("category").long("category").required(true))
    .arg(Arg::new("description").long("description").default_value(""))
    .arg(date_arg())
    .arg(
        Arg::new("recurring")
            .long("recurring")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("sapo")
        .version(crate_version!())
        .about("Personal cash-flow, liquid investment and project ledger")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite file (overrides SAPO_DB)"),
        )
        .subcommand(Command::new("init").about("Create the data store and print its path"))
        .subcommand(
            Command::new("tx")
                .about("Income and expense entries")
                .subcommand(tx_fields(Command::new("add")))
                .subcommand(tx_fields(
                    Command::new("update").arg(id_arg("id", "Transaction id")),
                ))
                .subcommand(Command::new("rm").arg(id_arg("id", "Transaction id")))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("invest")
                .about("Liquid holdings and project contributions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("financial | material"),
                        )
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("emoji").long("emoji").default_value(""))
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("deposit")
                        .arg(id_arg("id", "Investment id"))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(
                    Command::new("withdraw")
                        .arg(id_arg("id", "Investment id"))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg("id", "Investment id")))
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("project")
                .about("Material investments")
                .subcommand(
                    Command::new("add-component")
                        .arg(id_arg("project", "Project id"))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(Arg::new("notes").long("notes").default_value(""))
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("rm-component")
                        .arg(id_arg("project", "Project id"))
                        .arg(id_arg("component", "Component id")),
                )
                .subcommand(
                    Command::new("return")
                        .arg(id_arg("project", "Project id"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(date_arg()),
                )
                .subcommand(Command::new("rm").arg(id_arg("project", "Project id")))
                .subcommand(json_args(Command::new("list")))
                .subcommand(json_args(Command::new("contributions"))),
        )
        .subcommand(json_args(
            Command::new("balance")
                .about("Available cash")
                .arg(
                    Arg::new("at")
                        .long("at")
                        .help("Replay the balance as of YYYY-MM-DD"),
                ),
        ))
        .subcommand(
            Command::new("report")
                .about("Aggregates over transactions")
                .subcommand(json_args(
                    Command::new("cashflow").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                ))
                .subcommand(json_args(
                    Command::new("categories")
                        .arg(Arg::new("kind").long("kind").default_value("expense"))
                        .arg(Arg::new("month").long("month").help("YYYY-MM")),
                ))
                .subcommand(json_args(
                    Command::new("month").arg(
                        Arg::new("month")
                            .long("month")
                            .required(true)
                            .help("YYYY-MM"),
                    ),
                )),
        )
}
