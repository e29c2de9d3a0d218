// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sapo::{cli, commands, config::Config, db::SqliteStore, session::Tracker};

fn main() -> Result<()> {
    let cfg = Config::from_env()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();
    let db_path = matches
        .get_one::<String>("db")
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.db_path.clone());

    let store = SqliteStore::open(&db_path)?;
    let mut tracker = Tracker::open(store, &cfg.storage_key);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Ledger store at {}", db_path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut tracker, sub)?,
        Some(("invest", sub)) => commands::investments::handle(&mut tracker, sub)?,
        Some(("project", sub)) => commands::projects::handle(&mut tracker, sub)?,
        Some(("balance", sub)) => commands::balance::handle(tracker.ledger(), sub)?,
        Some(("report", sub)) => commands::reports::handle(tracker.ledger(), sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    for w in tracker.warnings() {
        eprintln!("warning: {}", w);
    }
    Ok(())
}
