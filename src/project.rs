// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Material investments made of several contributions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Entity, LedgerError};
use crate::models::{Component, ContributionEntry};
use crate::utils::{flexible_date, flexible_date_opt, flexible_datetime, lenient_decimal, now};
use crate::validate::{MAX_AMOUNT, bounded_sum};

/// A project keeps `net_value == total_invested - project_return` after every
/// mutation. The money fields are private so nothing outside these methods can
/// break that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub emoji: String,
    pub name: String,
    #[serde(default = "now", deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "flexible_date")]
    pub investment_date: NaiveDate,
    #[serde(deserialize_with = "lenient_decimal")]
    total_invested: Decimal,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    project_return: Decimal,
    #[serde(default, deserialize_with = "flexible_date_opt")]
    return_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    net_value: Decimal,
}

impl Project {
    pub fn new(id: String, emoji: String, name: String, value: Decimal, date: NaiveDate) -> Self {
        let mut p = Project {
            id,
            emoji,
            name,
            created_at: now(),
            investment_date: date,
            total_invested: value,
            components: Vec::new(),
            project_return: Decimal::ZERO,
            return_date: None,
            net_value: Decimal::ZERO,
        };
        p.refresh_net_value();
        p
    }

    pub fn total_invested(&self) -> Decimal {
        self.total_invested
    }

    pub fn project_return(&self) -> Decimal {
        self.project_return
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn net_value(&self) -> Decimal {
        self.net_value
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// What was put in when the project was opened.
    pub fn base_contribution(&self) -> Decimal {
        self.total_invested - self.components.iter().map(|c| c.value).sum::<Decimal>()
    }

    pub fn matches(&self, name: &str, emoji: &str) -> bool {
        self.name == name && self.emoji == emoji
    }

    pub(crate) fn refresh_net_value(&mut self) {
        self.net_value = self.total_invested - self.project_return;
    }

    /// Fails without touching the project when the new total would leave the
    /// accepted amount range.
    pub fn add_component(&mut self, component: Component) -> Result<(), LedgerError> {
        self.total_invested = bounded_sum("value", self.total_invested, component.value)?;
        self.components.push(component);
        self.refresh_net_value();
        Ok(())
    }

    pub fn remove_component(&mut self, component_id: &str) -> Result<Component, LedgerError> {
        let idx = self
            .components
            .iter()
            .position(|c| c.id == component_id)
            .ok_or_else(|| LedgerError::not_found(Entity::Component, component_id))?;
        let remaining = self.total_invested - self.components[idx].value;
        if remaining < Decimal::ZERO {
            tracing::error!(
                project = %self.id,
                component = component_id,
                %remaining,
                "component removal would make total invested negative"
            );
            return Err(LedgerError::Inconsistent {
                project_id: self.id.clone(),
                component_id: component_id.to_string(),
                remaining,
            });
        }
        let removed = self.components.remove(idx);
        self.total_invested = remaining;
        self.refresh_net_value();
        Ok(removed)
    }

    /// Resets money fields a stored record cannot legitimately hold.
    pub(crate) fn normalize(&mut self) {
        let out_of_range = |v: Decimal| v < Decimal::ZERO || v > MAX_AMOUNT;
        let id = self.id.clone();
        self.components.retain(|c| {
            let keep = !out_of_range(c.value);
            if !keep {
                tracing::warn!(
                    project = %id,
                    component = %c.id,
                    value = %c.value,
                    "dropping component with invalid value"
                );
            }
            keep
        });
        if out_of_range(self.total_invested) {
            let parts = self
                .components
                .iter()
                .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(c.value))
                .filter(|v| *v <= MAX_AMOUNT);
            tracing::warn!(
                project = %self.id,
                total = %self.total_invested,
                "total invested out of range, resetting"
            );
            match parts {
                Some(v) => self.total_invested = v,
                None => {
                    self.components.clear();
                    self.total_invested = Decimal::ZERO;
                }
            }
        }
        if out_of_range(self.project_return) {
            tracing::warn!(
                project = %self.id,
                value = %self.project_return,
                "project return out of range, clearing"
            );
            self.project_return = Decimal::ZERO;
            self.return_date = None;
        }
        self.refresh_net_value();
    }

    /// Records the cash recovered from the project. Zero clears the return.
    pub fn set_return(&mut self, amount: Decimal, date: NaiveDate) {
        self.project_return = amount;
        self.return_date = if amount.is_zero() { None } else { Some(date) };
        self.refresh_net_value();
    }

    /// Net value counting only what had happened by `date`.
    pub fn net_value_as_of(&self, date: NaiveDate) -> Decimal {
        let mut invested = Decimal::ZERO;
        if self.investment_date <= date {
            invested += self.base_contribution();
        }
        invested += self
            .components
            .iter()
            .filter(|c| c.date <= date)
            .map(|c| c.value)
            .sum::<Decimal>();
        let returned = match self.return_date {
            Some(d) if d <= date => self.project_return,
            _ => Decimal::ZERO,
        };
        invested - returned
    }

    pub fn contributions(&self) -> Vec<ContributionEntry> {
        let mut out = Vec::with_capacity(self.components.len() + 1);
        out.push(ContributionEntry {
            project_id: self.id.clone(),
            project_name: self.name.clone(),
            emoji: self.emoji.clone(),
            component_id: None,
            label: "Initial contribution".to_string(),
            value: self.base_contribution(),
            date: self.investment_date,
        });
        for c in &self.components {
            out.push(ContributionEntry {
                project_id: self.id.clone(),
                project_name: self.name.clone(),
                emoji: self.emoji.clone(),
                component_id: Some(c.id.clone()),
                label: c.name.clone(),
                value: c.value,
                date: c.date,
            });
        }
        out
    }
}
