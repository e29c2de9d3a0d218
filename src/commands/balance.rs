// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::ledger::Ledger;
use crate::models::BalanceBreakdown;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BalanceView {
    Now(BalanceBreakdown),
    At { date: String, total: String },
}

pub fn view(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<BalanceView> {
    Ok(match sub.get_one::<String>("at") {
        Some(raw) => {
            let date = parse_date(raw)?;
            BalanceView::At {
                date: date.to_string(),
                total: ledger.balance_at(date).to_string(),
            }
        }
        None => BalanceView::Now(ledger.breakdown()),
    })
}

pub fn handle(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let v = view(ledger, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
        return Ok(());
    }
    match v {
        BalanceView::Now(b) => {
            let rows = vec![
                vec!["Cash flow".to_string(), fmt_money(&b.cash_flow)],
                vec!["Liquid investments".to_string(), fmt_money(&-b.liquid_value)],
                vec!["Projects (net)".to_string(), fmt_money(&-b.projects_net_value)],
                vec!["Balance".to_string(), fmt_money(&b.total)],
            ];
            println!("{}", pretty_table(&["", "Amount"], rows));
        }
        BalanceView::At { date, total } => println!("Balance on {}: {}", date, total),
    }
    Ok(())
}
