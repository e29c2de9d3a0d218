// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use super::{arg, date_or_today};
use crate::ledger::Ledger;
use crate::session::Tracker;
use crate::storage::KeyValueStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::validate::{ComponentInput, parse_amount};

pub fn handle<S: KeyValueStore>(tracker: &mut Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add-component", sub)) => add_component(tracker, sub)?,
        Some(("rm-component", sub)) => remove_component(tracker, sub)?,
        Some(("return", sub)) => set_return(tracker, sub)?,
        Some(("rm", sub)) => remove(tracker, sub)?,
        Some(("list", sub)) => list(tracker.ledger(), sub)?,
        Some(("contributions", sub)) => contributions(tracker.ledger(), sub)?,
        _ => {}
    }
    Ok(())
}

fn add_component<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = arg(sub, "project");
    let input = ComponentInput {
        name: arg(sub, "name"),
        price: arg(sub, "price"),
        notes: arg(sub, "notes"),
        date: date_or_today(sub)?,
    };
    let id = tracker.apply(|l| l.add_component(&project_id, &input))?;
    if let Some(p) = tracker.ledger().project(&project_id) {
        println!(
            "Added '{}' to {} (invested {}, net {}) [{}]",
            input.name.trim(),
            p.name,
            fmt_money(&p.total_invested()),
            fmt_money(&p.net_value()),
            id
        );
    }
    Ok(())
}

fn remove_component<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let project_id = arg(sub, "project");
    let component_id = arg(sub, "component");
    let c = tracker.apply(|l| l.remove_component(&project_id, &component_id))?;
    println!("Removed component '{}' ({})", c.name, fmt_money(&c.value));
    Ok(())
}

fn set_return<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = arg(sub, "project");
    let amount = parse_amount("amount", &arg(sub, "amount"))?;
    let date = date_or_today(sub)?;
    tracker.apply(|l| l.set_project_return(&project_id, amount, date))?;
    if let Some(p) = tracker.ledger().project(&project_id) {
        println!(
            "Return for {} set to {} (net {})",
            p.name,
            fmt_money(&p.project_return()),
            fmt_money(&p.net_value())
        );
    }
    Ok(())
}

fn remove<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = arg(sub, "project");
    let deletion = tracker.apply(|l| l.delete_project(&project_id))?;
    println!(
        "Deleted project '{}', released {}",
        deletion.project.name,
        fmt_money(&deletion.project.total_invested())
    );
    if let Some(tx_id) = deletion.return_transaction {
        println!(
            "Return of {} kept as income [{}]",
            fmt_money(&deletion.project.project_return()),
            tx_id
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub id: String,
    pub emoji: String,
    pub name: String,
    pub total_invested: String,
    pub project_return: String,
    pub net_value: String,
    pub components: usize,
    pub return_date: Option<String>,
}

pub fn rows(ledger: &Ledger) -> Vec<ProjectRow> {
    ledger
        .projects()
        .iter()
        .map(|p| ProjectRow {
            id: p.id.clone(),
            emoji: p.emoji.clone(),
            name: p.name.clone(),
            total_invested: fmt_money(&p.total_invested()),
            project_return: fmt_money(&p.project_return()),
            net_value: fmt_money(&p.net_value()),
            components: p.components().len(),
            return_date: p.return_date().map(|d| d.to_string()),
        })
        .collect()
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = rows(ledger);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let table = data
            .into_iter()
            .map(|r| {
                vec![
                    format!("{} {}", r.emoji, r.name),
                    r.total_invested,
                    r.project_return,
                    r.net_value,
                    r.components.to_string(),
                    r.id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Project", "Invested", "Return", "Net", "Components", "Id"],
                table
            )
        );
    }
    Ok(())
}

fn contributions(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = ledger.contributions();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let table = data
            .into_iter()
            .map(|c| {
                vec![
                    c.date.to_string(),
                    format!("{} {}", c.emoji, c.project_name),
                    c.label,
                    fmt_money(&c.value),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Project", "Contribution", "Value"], table)
        );
    }
    Ok(())
}
