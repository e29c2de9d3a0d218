// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::{flexible_date, flexible_datetime, lenient_decimal, now};

/// Category recorded on the income entry created when a project with a
/// return is deleted.
pub const PROJECT_RETURN_CATEGORY: &str = "Project Return";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(TxKind::Income),
            "expense" => Some(TxKind::Expense),
            _ => None,
        }
    }

    pub fn sign(self) -> Decimal {
        match self {
            TxKind::Income => Decimal::ONE,
            TxKind::Expense => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Income => f.write_str("income"),
            TxKind::Expense => f.write_str("expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestmentKind {
    /// Liquid holding (stocks, crypto, funds).
    Financial,
    /// Project built from several contributions.
    Material,
}

impl InvestmentKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "financial" | "liquid" => Some(InvestmentKind::Financial),
            "material" | "project" => Some(InvestmentKind::Material),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: TxKind,
    #[serde(deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub recurring: bool,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.kind.sign() * self.amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidInvestment {
    pub id: String,
    #[serde(default)]
    pub emoji: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub value: Decimal,
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default = "now", deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub value: Decimal,
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default = "now", deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
}

/// One row of the flattened contributions view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionEntry {
    pub project_id: String,
    pub project_name: String,
    pub emoji: String,
    /// `None` for the base contribution that opened the project.
    pub component_id: Option<String>,
    pub label: String,
    pub value: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceBreakdown {
    pub cash_flow: Decimal,
    pub liquid_value: Decimal,
    pub projects_net_value: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}
