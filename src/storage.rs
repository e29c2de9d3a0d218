// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persisted layout of the ledger and the key-value store boundary.
//!
//! Two on-disk shapes exist. The current one carries a `version` tag and
//! separate `liquidInvestments` / `projects` lists; the legacy one has no tag
//! and keeps every investment in one flat `investments` array with a `type`
//! discriminator. Loading always goes through [`migrate`].

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::ledger::Ledger;
use crate::models::{Component, InvestmentKind, LiquidInvestment, Transaction};
use crate::project::Project;
use crate::utils::{flexible_date, flexible_date_opt, flexible_datetime, lenient_decimal, now};
use crate::validate::default_emoji;

pub const CURRENT_VERSION: u32 = 2;
pub const DEFAULT_STORAGE_KEY: &str = "sapo-tracker-data";

/// Local key-value store holding the serialised ledger.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let s = Self::new();
        s.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        s
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    pub version: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub liquid_investments: Vec<LiquidInvestment>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl LedgerState {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        LedgerState {
            version: CURRENT_VERSION,
            transactions: ledger.transactions().to_vec(),
            liquid_investments: ledger.liquid_investments().to_vec(),
            projects: ledger.projects().to_vec(),
        }
    }

    pub fn into_ledger(self) -> Ledger {
        Ledger::from_parts(self.transactions, self.liquid_investments, self.projects)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyInvestment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub emoji: String,
    pub name: String,
    #[serde(alias = "value", deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(deserialize_with = "flexible_date")]
    pub date: NaiveDate,
    #[serde(default = "now", deserialize_with = "flexible_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub project_return: Decimal,
    #[serde(default, deserialize_with = "flexible_date_opt")]
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyState {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub investments: Vec<LegacyInvestment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersistedState {
    Current(LedgerState),
    Legacy(LegacyState),
}

impl PersistedState {
    pub fn decode(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("Stored ledger is not valid JSON")?;
        match value.get("version") {
            None => {
                let legacy: LegacyState =
                    serde_json::from_value(value).context("Decode legacy ledger")?;
                Ok(PersistedState::Legacy(legacy))
            }
            Some(v) => {
                let version = v.as_u64().unwrap_or(0);
                if version != u64::from(CURRENT_VERSION) {
                    bail!("Unsupported ledger schema version {}", v);
                }
                let state: LedgerState =
                    serde_json::from_value(value).context("Decode ledger")?;
                Ok(PersistedState::Current(state))
            }
        }
    }
}

/// Brings any persisted shape up to the current one.
pub fn migrate(state: PersistedState) -> LedgerState {
    let legacy = match state {
        PersistedState::Current(s) => return s,
        PersistedState::Legacy(l) => l,
    };
    info!(
        transactions = legacy.transactions.len(),
        investments = legacy.investments.len(),
        "migrating legacy ledger"
    );

    let mut investments = legacy.investments;
    // Oldest record of a project becomes its base contribution.
    investments.sort_by(|a, b| a.date.cmp(&b.date));

    let mut liquid_investments = Vec::new();
    let mut projects: Vec<Project> = Vec::new();
    for rec in investments {
        match InvestmentKind::parse(&rec.kind) {
            Some(InvestmentKind::Financial) => liquid_investments.push(LiquidInvestment {
                id: rec.id,
                emoji: rec.emoji,
                name: rec.name,
                value: rec.amount,
                date: rec.date,
                created_at: rec.created_at,
            }),
            Some(InvestmentKind::Material) => {
                let emoji = if rec.emoji.trim().is_empty() {
                    default_emoji(InvestmentKind::Material).to_string()
                } else {
                    rec.emoji
                };
                let idx = match projects.iter().position(|p| p.matches(&rec.name, &emoji)) {
                    Some(idx) => {
                        let appended = projects[idx].add_component(Component {
                            id: rec.id.clone(),
                            name: format!("Additional contribution ({})", rec.date),
                            notes: String::new(),
                            value: rec.amount,
                            date: rec.date,
                            created_at: rec.created_at,
                        });
                        if let Err(e) = appended {
                            warn!(id = %rec.id, error = %e, "skipping legacy contribution");
                            continue;
                        }
                        idx
                    }
                    None => {
                        let mut p = Project::new(rec.id, emoji, rec.name, rec.amount, rec.date);
                        p.created_at = rec.created_at;
                        projects.push(p);
                        projects.len() - 1
                    }
                };
                if rec.project_return > Decimal::ZERO {
                    let date = rec.return_date.unwrap_or(rec.date);
                    projects[idx].set_return(rec.project_return, date);
                }
            }
            None => warn!(id = %rec.id, kind = %rec.kind, "skipping legacy investment of unknown type"),
        }
    }

    LedgerState {
        version: CURRENT_VERSION,
        transactions: legacy.transactions,
        liquid_investments,
        projects,
    }
}

/// Reads the ledger under `key`; `None` means nothing was stored yet.
pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Option<Ledger>> {
    match store.get(key)? {
        Some(raw) => decode_ledger(&raw),
        None => Ok(None),
    }
}

/// Decodes a stored payload; blank means nothing was stored.
pub fn decode_ledger(raw: &str) -> Result<Option<Ledger>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let state = migrate(PersistedState::decode(raw)?);
    Ok(Some(state.into_ledger()))
}

/// Key an unreadable payload is copied to before it is overwritten.
pub fn unreadable_key(key: &str) -> String {
    format!("{}.unreadable", key)
}

pub fn save(store: &dyn KeyValueStore, key: &str, ledger: &Ledger) -> Result<()> {
    let payload = serde_json::to_string(&LedgerState::from_ledger(ledger))?;
    store.set(key, &payload)
}
