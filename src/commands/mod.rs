// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod balance;
pub mod investments;
pub mod projects;
pub mod reports;
pub mod transactions;

use anyhow::Result;
use chrono::NaiveDate;

use crate::utils::{parse_date, today};

/// `--date` when given, today otherwise.
pub(crate) fn date_or_today(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw),
        None => Ok(today()),
    }
}

pub(crate) fn arg(sub: &clap::ArgMatches, name: &str) -> String {
    sub.get_one::<String>(name)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
