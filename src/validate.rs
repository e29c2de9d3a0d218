// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Raw entry inputs and their validation.
//!
//! Each creation path collects every field error before touching the ledger,
//! so a rejected input never leaves partial state behind.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{FieldError, LedgerError};
use crate::models::{InvestmentKind, TxKind};

#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub recurring: bool,
}

#[derive(Debug, Clone)]
pub struct InvestmentInput {
    pub kind: String,
    pub emoji: String,
    pub name: String,
    pub value: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ComponentInput {
    pub name: String,
    pub price: String,
    pub notes: String,
    pub date: NaiveDate,
}

pub(crate) struct ValidTransaction {
    pub kind: TxKind,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub recurring: bool,
}

pub(crate) struct ValidInvestment {
    pub kind: InvestmentKind,
    pub emoji: String,
    pub name: String,
    pub value: Decimal,
    pub date: NaiveDate,
}

pub(crate) struct ValidComponent {
    pub name: String,
    pub price: Decimal,
    pub notes: String,
    pub date: NaiveDate,
}

/// Largest amount a single entry, holding or project total may carry.
///
/// Keeps every balance sum far inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0);

fn number(field: &'static str, raw: &str) -> Result<Decimal, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    let v = raw
        .parse::<Decimal>()
        .map_err(|_| FieldError::new(field, format!("'{}' is not a number", raw)))?;
    if v > MAX_AMOUNT {
        return Err(too_large(field));
    }
    Ok(v)
}

fn too_large(field: &'static str) -> FieldError {
    FieldError::new(field, format!("must not exceed {}", MAX_AMOUNT))
}

/// Parses a strictly positive amount.
pub fn positive_amount(field: &'static str, raw: &str) -> Result<Decimal, FieldError> {
    let v = number(field, raw)?;
    if v <= Decimal::ZERO {
        return Err(FieldError::new(field, "must be greater than zero"));
    }
    Ok(v)
}

/// Parses an amount typed on the command line. Range checks are left to the
/// ledger operation receiving it.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, LedgerError> {
    number(field, raw).map_err(|e| LedgerError::Validation(vec![e]))
}

/// `a + b`, refused when the result leaves the accepted range.
pub fn bounded_sum(field: &'static str, a: Decimal, b: Decimal) -> Result<Decimal, LedgerError> {
    match a.checked_add(b) {
        Some(v) if v <= MAX_AMOUNT => Ok(v),
        _ => Err(LedgerError::Validation(vec![too_large(field)])),
    }
}

pub fn required_text(field: &'static str, raw: &str) -> Result<String, FieldError> {
    let t = raw.trim();
    if t.is_empty() {
        Err(FieldError::new(field, "must not be empty"))
    } else {
        Ok(t.to_string())
    }
}

/// Amounts handed over already typed (returns, deposits) only need a range check.
pub fn ensure_positive(field: &'static str, v: Decimal) -> Result<(), LedgerError> {
    if v <= Decimal::ZERO {
        return Err(LedgerError::invalid(field, "must be greater than zero"));
    }
    if v > MAX_AMOUNT {
        return Err(LedgerError::Validation(vec![too_large(field)]));
    }
    Ok(())
}

pub fn ensure_non_negative(field: &'static str, v: Decimal) -> Result<(), LedgerError> {
    if v < Decimal::ZERO {
        return Err(LedgerError::invalid(field, "must not be negative"));
    }
    if v > MAX_AMOUNT {
        return Err(LedgerError::Validation(vec![too_large(field)]));
    }
    Ok(())
}

fn collect<T>(errors: &mut Vec<FieldError>, r: Result<T, FieldError>) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

impl TransactionInput {
    pub(crate) fn validate(&self) -> Result<ValidTransaction, LedgerError> {
        let mut errors = Vec::new();
        let kind = collect(
            &mut errors,
            TxKind::parse(&self.kind).ok_or_else(|| {
                FieldError::new(
                    "kind",
                    format!("'{}' is not one of income, expense", self.kind.trim()),
                )
            }),
        );
        let amount = collect(&mut errors, positive_amount("amount", &self.amount));
        let category = collect(&mut errors, required_text("category", &self.category));
        match (kind, amount, category) {
            (Some(kind), Some(amount), Some(category)) if errors.is_empty() => {
                Ok(ValidTransaction {
                    kind,
                    amount,
                    category,
                    description: self.description.trim().to_string(),
                    date: self.date,
                    recurring: self.recurring,
                })
            }
            _ => Err(LedgerError::Validation(errors)),
        }
    }
}

impl InvestmentInput {
    pub(crate) fn validate(&self) -> Result<ValidInvestment, LedgerError> {
        let mut errors = Vec::new();
        let kind = collect(
            &mut errors,
            InvestmentKind::parse(&self.kind).ok_or_else(|| {
                FieldError::new(
                    "kind",
                    format!("'{}' is not one of financial, material", self.kind.trim()),
                )
            }),
        );
        let name = collect(&mut errors, required_text("name", &self.name));
        let value = collect(&mut errors, positive_amount("value", &self.value));
        match (kind, name, value) {
            (Some(kind), Some(name), Some(value)) if errors.is_empty() => {
                let emoji = match self.emoji.trim() {
                    "" => default_emoji(kind).to_string(),
                    e => e.to_string(),
                };
                Ok(ValidInvestment {
                    kind,
                    emoji,
                    name,
                    value,
                    date: self.date,
                })
            }
            _ => Err(LedgerError::Validation(errors)),
        }
    }
}

impl ComponentInput {
    pub(crate) fn validate(&self) -> Result<ValidComponent, LedgerError> {
        let mut errors = Vec::new();
        let name = collect(&mut errors, required_text("name", &self.name));
        let price = collect(&mut errors, positive_amount("price", &self.price));
        match (name, price) {
            (Some(name), Some(price)) if errors.is_empty() => Ok(ValidComponent {
                name,
                price,
                notes: self.notes.trim().to_string(),
                date: self.date,
            }),
            _ => Err(LedgerError::Validation(errors)),
        }
    }
}

pub fn default_emoji(kind: InvestmentKind) -> &'static str {
    match kind {
        InvestmentKind::Financial => "📈",
        InvestmentKind::Material => "🏗️",
    }
}
