// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::{arg, date_or_today};
use crate::ledger::{InvestmentOutcome, Ledger, LiquidUpdate};
use crate::session::Tracker;
use crate::storage::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::validate::{InvestmentInput, parse_amount};

pub fn handle<S: KeyValueStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(tracker, sub)?,
        Some(("deposit", sub)) => deposit(tracker, sub)?,
        Some(("withdraw", sub)) => withdraw(tracker, sub)?,
        Some(("rm", sub)) => remove(tracker, sub)?,
        Some(("list", sub)) => list(tracker.ledger(), sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let input = InvestmentInput {
        kind: arg(sub, "kind"),
        emoji: arg(sub, "emoji"),
        name: arg(sub, "name"),
        value: arg(sub, "value"),
        date: date_or_today(sub)?,
    };
    match tracker.apply(|l| l.add_investment(&input))? {
        InvestmentOutcome::Liquid { id } => {
            println!("Added investment '{}' [{}]", input.name.trim(), id)
        }
        InvestmentOutcome::ProjectCreated { project_id } => {
            println!("Opened project '{}' [{}]", input.name.trim(), project_id)
        }
        InvestmentOutcome::ComponentAppended {
            project_id,
            component_id,
        } => println!(
            "Added contribution {} to project '{}' [{}]",
            component_id,
            input.name.trim(),
            project_id
        ),
    }
    Ok(())
}

fn deposit<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id");
    let amount = parse_amount("amount", &arg(sub, "amount"))?;
    let value = tracker.apply(|l| l.deposit(&id, amount))?;
    println!("Investment {} now at {}", id, fmt_money(&value));
    Ok(())
}

fn withdraw<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id");
    let amount = parse_amount("amount", &arg(sub, "amount"))?;
    match tracker.apply(|l| l.withdraw(&id, amount))? {
        LiquidUpdate::Updated(value) => {
            println!("Investment {} now at {}", id, fmt_money(&value))
        }
        LiquidUpdate::Removed(inv) => println!("Investment '{}' emptied and removed", inv.name),
    }
    Ok(())
}

fn remove<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id");
    let inv = tracker.apply(|l| l.remove_liquid_investment(&id))?;
    println!("Removed investment '{}'", inv.name);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct InvestmentRow {
    pub id: String,
    pub emoji: String,
    pub name: String,
    pub value: String,
    pub date: String,
}

pub fn rows(ledger: &Ledger) -> Vec<InvestmentRow> {
    ledger
        .liquid_investments()
        .iter()
        .map(|i| InvestmentRow {
            id: i.id.clone(),
            emoji: i.emoji.clone(),
            name: i.name.clone(),
            value: fmt_money(&i.value),
            date: i.date.to_string(),
        })
        .collect()
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = rows(ledger);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let table = data
            .into_iter()
            .map(|r| vec![format!("{} {}", r.emoji, r.name), r.value, r.date, r.id])
            .collect();
        println!(
            "{}",
            pretty_table(&["Investment", "Value", "Date", "Id"], table)
        );
    }
    Ok(())
}
