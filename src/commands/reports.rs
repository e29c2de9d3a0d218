// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};

use crate::ledger::Ledger;
use crate::models::TxKind;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(ledger, sub)?,
        Some(("categories", sub)) => categories(ledger, sub)?,
        Some(("month", sub)) => month(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let data = ledger.monthly_summary(months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|s| {
                vec![
                    s.month,
                    fmt_money(&s.income),
                    fmt_money(&s.expense),
                    fmt_money(&(s.income - s.expense)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

pub fn category_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<Vec<String>>> {
    let raw_kind = sub
        .get_one::<String>("kind")
        .map(|s| s.as_str())
        .unwrap_or("expense");
    let kind = TxKind::parse(raw_kind).ok_or_else(|| anyhow!("Unknown kind '{}'", raw_kind))?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let mut items: Vec<_> = ledger.category_totals(kind, month).into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(items
        .into_iter()
        .map(|(cat, amt)| vec![cat, fmt_money(&amt)])
        .collect())
}

fn categories(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = category_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Category", "Total"], data));
    }
    Ok(())
}

fn month(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("month").map(|s| s.as_str()).unwrap_or("");
    let (y, m) = parse_month(raw)?;
    let income = ledger.monthly_income(y, m);
    let expense = ledger.monthly_expense(y, m);
    let data = vec![vec![
        raw.trim().to_string(),
        fmt_money(&income),
        fmt_money(&expense),
        fmt_money(&(income - expense)),
    ]];
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], data)
        );
    }
    Ok(())
}
