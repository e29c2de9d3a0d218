// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;

use super::{arg, date_or_today};
use crate::ledger::Ledger;
use crate::models::TxKind;
use crate::session::Tracker;
use crate::storage::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use crate::validate::TransactionInput;

pub fn handle<S: KeyValueStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(tracker, sub)?,
        Some(("update", sub)) => update(tracker, sub)?,
        Some(("rm", sub)) => remove(tracker, sub)?,
        Some(("list", sub)) => list(tracker.ledger(), sub)?,
        _ => {}
    }
    Ok(())
}

fn input_from(sub: &clap::ArgMatches) -> Result<TransactionInput> {
    Ok(TransactionInput {
        kind: arg(sub, "kind"),
        amount: arg(sub, "amount"),
        category: arg(sub, "category"),
        description: arg(sub, "description"),
        date: date_or_today(sub)?,
        recurring: sub.get_flag("recurring"),
    })
}

fn add<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let input = input_from(sub)?;
    let id = tracker.apply(|l| l.add_transaction(&input))?;
    if let Some(t) = tracker.ledger().transaction(&id) {
        println!(
            "Recorded {} {} ({}) on {} [{}]",
            t.kind,
            fmt_money(&t.amount),
            t.category,
            t.date,
            id
        );
    }
    Ok(())
}

fn update<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id");
    let input = input_from(sub)?;
    tracker.apply(|l| l.update_transaction(&id, &input))?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id");
    let t = tracker.apply(|l| l.remove_transaction(&id))?;
    println!(
        "Removed {} {} ({}) from {}",
        t.kind,
        fmt_money(&t.amount),
        t.category,
        t.date
    );
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                    if r.recurring { "yes".into() } else { String::new() },
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Kind", "Category", "Amount", "Description", "Recurring", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub recurring: bool,
}

/// Filtered transactions, newest first.
pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let kind = sub
        .get_one::<String>("kind")
        .map(|k| TxKind::parse(k).ok_or_else(|| anyhow::anyhow!("Unknown kind '{}'", k)))
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|c| c.trim().to_string());

    let mut txs: Vec<_> = ledger
        .transactions()
        .iter()
        .filter(|t| month.is_none_or(|(y, m)| t.date.year() == y && t.date.month() == m))
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| category.as_deref().is_none_or(|c| t.category == c))
        .collect();
    // Same-day entries: latest recorded first.
    txs.reverse();
    txs.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            category: t.category.clone(),
            amount: fmt_money(&t.amount),
            description: t.description.clone(),
            recurring: t.recurring,
        })
        .collect())
}
