// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger aggregate: transactions, liquid investments and projects.
//!
//! Nothing here caches a running balance. Every read walks the three
//! collections again, so the figures can never drift from the entries.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Entity, LedgerError};
use crate::models::{
    BalanceBreakdown, Component, ContributionEntry, InvestmentKind, LiquidInvestment,
    MonthSummary, PROJECT_RETURN_CATEGORY, Transaction, TxKind,
};
use crate::project::Project;
use crate::utils::{month_key, now, today};
use crate::validate::{
    ComponentInput, InvestmentInput, MAX_AMOUNT, TransactionInput, bounded_sum,
    ensure_non_negative, ensure_positive,
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Result of recording an investment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestmentOutcome {
    Liquid { id: String },
    ProjectCreated { project_id: String },
    ComponentAppended { project_id: String, component_id: String },
}

impl InvestmentOutcome {
    pub fn id(&self) -> &str {
        match self {
            InvestmentOutcome::Liquid { id } => id,
            InvestmentOutcome::ProjectCreated { project_id }
            | InvestmentOutcome::ComponentAppended { project_id, .. } => project_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiquidUpdate {
    Updated(Decimal),
    /// The value reached zero or below and the holding was dropped.
    Removed(LiquidInvestment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDeletion {
    pub project: Project,
    /// Income entry created from the project return, if there was one.
    pub return_transaction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    liquid_investments: Vec<LiquidInvestment>,
    projects: Vec<Project>,
}

/// Available cash: signed cash flow minus everything parked in investments.
pub fn compute_balance(ledger: &Ledger) -> Decimal {
    ledger.breakdown().total
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from loaded records, normalising money a stored record
    /// cannot legitimately hold.
    pub fn from_parts(
        mut transactions: Vec<Transaction>,
        mut liquid_investments: Vec<LiquidInvestment>,
        mut projects: Vec<Project>,
    ) -> Self {
        for t in &mut transactions {
            if t.amount < Decimal::ZERO || t.amount > MAX_AMOUNT {
                warn!(
                    id = %t.id,
                    amount = %t.amount,
                    "transaction amount out of range, counting as zero"
                );
                t.amount = Decimal::ZERO;
            }
        }
        liquid_investments.retain(|i| {
            let keep = i.value > Decimal::ZERO && i.value <= MAX_AMOUNT;
            if !keep {
                warn!(id = %i.id, value = %i.value, "dropping investment with invalid value");
            }
            keep
        });
        // Stored net values are never trusted.
        for p in &mut projects {
            p.normalize();
        }
        Ledger {
            transactions,
            liquid_investments,
            projects,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn liquid_investments(&self) -> &[LiquidInvestment] {
        &self.liquid_investments
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn liquid_investment(&self, id: &str) -> Option<&LiquidInvestment> {
        self.liquid_investments.iter().find(|i| i.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn project_mut(&mut self, id: &str) -> Result<&mut Project, LedgerError> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::not_found(Entity::Project, id))
    }

    // ---- transactions ----

    pub fn add_transaction(&mut self, input: &TransactionInput) -> Result<String, LedgerError> {
        let v = input.validate()?;
        let id = new_id();
        debug!(%id, kind = %v.kind, amount = %v.amount, "add transaction");
        self.transactions.push(Transaction {
            id: id.clone(),
            kind: v.kind,
            amount: v.amount,
            category: v.category,
            description: v.description,
            date: v.date,
            recurring: v.recurring,
        });
        Ok(id)
    }

    pub fn update_transaction(
        &mut self,
        id: &str,
        input: &TransactionInput,
    ) -> Result<(), LedgerError> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::not_found(Entity::Transaction, id))?;
        let v = input.validate()?;
        debug!(%id, "update transaction");
        self.transactions[idx] = Transaction {
            id: id.to_string(),
            kind: v.kind,
            amount: v.amount,
            category: v.category,
            description: v.description,
            date: v.date,
            recurring: v.recurring,
        };
        Ok(())
    }

    pub fn remove_transaction(&mut self, id: &str) -> Result<Transaction, LedgerError> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::not_found(Entity::Transaction, id))?;
        debug!(%id, "remove transaction");
        Ok(self.transactions.remove(idx))
    }

    // ---- investments ----

    /// Records a financial holding or a project contribution, by `input.kind`.
    pub fn add_investment(
        &mut self,
        input: &InvestmentInput,
    ) -> Result<InvestmentOutcome, LedgerError> {
        let v = input.validate()?;
        match v.kind {
            InvestmentKind::Financial => {
                let id = new_id();
                debug!(%id, name = %v.name, value = %v.value, "add liquid investment");
                self.liquid_investments.push(LiquidInvestment {
                    id: id.clone(),
                    emoji: v.emoji,
                    name: v.name,
                    value: v.value,
                    date: v.date,
                    created_at: now(),
                });
                Ok(InvestmentOutcome::Liquid { id })
            }
            InvestmentKind::Material => self.contribute(v.emoji, v.name, v.value, v.date),
        }
    }

    /// Appends to the project with the same name and emoji, or opens a new one.
    ///
    /// Two unrelated projects sharing name and emoji are merged; callers that
    /// need a specific project use [`Ledger::add_component`].
    fn contribute(
        &mut self,
        emoji: String,
        name: String,
        value: Decimal,
        date: NaiveDate,
    ) -> Result<InvestmentOutcome, LedgerError> {
        if let Some(p) = self.projects.iter_mut().find(|p| p.matches(&name, &emoji)) {
            let component_id = new_id();
            debug!(project = %p.id, %value, "append contribution to project");
            p.add_component(Component {
                id: component_id.clone(),
                name: format!("Additional contribution ({})", date),
                notes: String::new(),
                value,
                date,
                created_at: now(),
            })?;
            return Ok(InvestmentOutcome::ComponentAppended {
                project_id: p.id.clone(),
                component_id,
            });
        }
        let project_id = new_id();
        debug!(project = %project_id, %name, %value, "open project");
        self.projects
            .push(Project::new(project_id.clone(), emoji, name, value, date));
        Ok(InvestmentOutcome::ProjectCreated { project_id })
    }

    pub fn deposit(&mut self, id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        ensure_positive("amount", amount)?;
        let inv = self
            .liquid_investments
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LedgerError::not_found(Entity::LiquidInvestment, id))?;
        inv.value = bounded_sum("amount", inv.value, amount)?;
        debug!(%id, value = %inv.value, "deposit");
        Ok(inv.value)
    }

    pub fn withdraw(&mut self, id: &str, amount: Decimal) -> Result<LiquidUpdate, LedgerError> {
        ensure_positive("amount", amount)?;
        let idx = self
            .liquid_investments
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| LedgerError::not_found(Entity::LiquidInvestment, id))?;
        let remaining = self.liquid_investments[idx].value - amount;
        if remaining <= Decimal::ZERO {
            debug!(%id, "withdraw emptied investment, removing");
            return Ok(LiquidUpdate::Removed(self.liquid_investments.remove(idx)));
        }
        self.liquid_investments[idx].value = remaining;
        debug!(%id, value = %remaining, "withdraw");
        Ok(LiquidUpdate::Updated(remaining))
    }

    pub fn remove_liquid_investment(&mut self, id: &str) -> Result<LiquidInvestment, LedgerError> {
        let idx = self
            .liquid_investments
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| LedgerError::not_found(Entity::LiquidInvestment, id))?;
        debug!(%id, "remove liquid investment");
        Ok(self.liquid_investments.remove(idx))
    }

    // ---- projects ----

    pub fn add_component(
        &mut self,
        project_id: &str,
        input: &ComponentInput,
    ) -> Result<String, LedgerError> {
        let v = input.validate()?;
        let p = self.project_mut(project_id)?;
        let id = new_id();
        debug!(project = %project_id, component = %id, price = %v.price, "add component");
        p.add_component(Component {
            id: id.clone(),
            name: v.name,
            notes: v.notes,
            value: v.price,
            date: v.date,
            created_at: now(),
        })?;
        Ok(id)
    }

    pub fn remove_component(
        &mut self,
        project_id: &str,
        component_id: &str,
    ) -> Result<Component, LedgerError> {
        debug!(project = %project_id, component = %component_id, "remove component");
        self.project_mut(project_id)?.remove_component(component_id)
    }

    pub fn set_project_return(
        &mut self,
        project_id: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<(), LedgerError> {
        ensure_non_negative("amount", amount)?;
        let p = self.project_mut(project_id)?;
        p.set_return(amount, date);
        debug!(project = %project_id, %amount, net = %p.net_value(), "set project return");
        Ok(())
    }

    /// Deletes a project, turning any realised return into permanent income.
    ///
    /// The balance rises by exactly the project's total invested: the return
    /// stops being netted against the investment and shows up as income.
    pub fn delete_project(&mut self, project_id: &str) -> Result<ProjectDeletion, LedgerError> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| LedgerError::not_found(Entity::Project, project_id))?;
        let project = self.projects.remove(idx);
        let return_transaction = if project.project_return() > Decimal::ZERO {
            let id = new_id();
            self.transactions.push(Transaction {
                id: id.clone(),
                kind: TxKind::Income,
                amount: project.project_return(),
                category: PROJECT_RETURN_CATEGORY.to_string(),
                description: format!("Return from {} {}", project.emoji, project.name)
                    .trim()
                    .to_string(),
                date: project.return_date().unwrap_or_else(today),
                recurring: false,
            });
            Some(id)
        } else {
            None
        };
        debug!(
            project = %project_id,
            invested = %project.total_invested(),
            returned = %project.project_return(),
            "delete project"
        );
        Ok(ProjectDeletion {
            project,
            return_transaction,
        })
    }

    // ---- reads ----

    pub fn balance(&self) -> Decimal {
        compute_balance(self)
    }

    pub fn breakdown(&self) -> BalanceBreakdown {
        let cash_flow: Decimal = self.transactions.iter().map(|t| t.signed_amount()).sum();
        let liquid_value: Decimal = self.liquid_investments.iter().map(|i| i.value).sum();
        let projects_net_value: Decimal = self.projects.iter().map(|p| p.net_value()).sum();
        BalanceBreakdown {
            cash_flow,
            liquid_value,
            projects_net_value,
            total: cash_flow - liquid_value - projects_net_value,
        }
    }

    /// Balance replayed from the entries dated on or before `date`.
    pub fn balance_at(&self, date: NaiveDate) -> Decimal {
        let cash_flow: Decimal = self
            .transactions
            .iter()
            .filter(|t| t.date <= date)
            .map(|t| t.signed_amount())
            .sum();
        let liquid_value: Decimal = self
            .liquid_investments
            .iter()
            .filter(|i| i.date <= date)
            .map(|i| i.value)
            .sum();
        let projects: Decimal = self.projects.iter().map(|p| p.net_value_as_of(date)).sum();
        cash_flow - liquid_value - projects
    }

    fn month_total(&self, kind: TxKind, year: i32, month: u32) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.kind == kind && t.date.year() == year && t.date.month() == month)
            .map(|t| t.amount)
            .sum()
    }

    pub fn monthly_income(&self, year: i32, month: u32) -> Decimal {
        self.month_total(TxKind::Income, year, month)
    }

    pub fn monthly_expense(&self, year: i32, month: u32) -> Decimal {
        self.month_total(TxKind::Expense, year, month)
    }

    pub fn category_totals(
        &self,
        kind: TxKind,
        month: Option<(i32, u32)>,
    ) -> BTreeMap<String, Decimal> {
        let mut agg = BTreeMap::new();
        for t in self.transactions.iter().filter(|t| t.kind == kind) {
            if let Some((y, m)) = month {
                if t.date.year() != y || t.date.month() != m {
                    continue;
                }
            }
            *agg.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
        }
        agg
    }

    /// Income and expense per month, newest first.
    pub fn monthly_summary(&self, limit: usize) -> Vec<MonthSummary> {
        let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for t in &self.transactions {
            let entry = map
                .entry(month_key(t.date))
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match t.kind {
                TxKind::Income => entry.0 += t.amount,
                TxKind::Expense => entry.1 += t.amount,
            }
        }
        map.into_iter()
            .rev()
            .take(limit)
            .map(|(month, (income, expense))| MonthSummary {
                month,
                income,
                expense,
            })
            .collect()
    }

    /// Every project contribution as one flat list, oldest first.
    pub fn contributions(&self) -> Vec<ContributionEntry> {
        let mut rows: Vec<ContributionEntry> =
            self.projects.iter().flat_map(|p| p.contributions()).collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn tx(kind: &str, amount: &str, category: &str, date: NaiveDate) -> TransactionInput {
        TransactionInput {
            kind: kind.into(),
            amount: amount.into(),
            category: category.into(),
            description: String::new(),
            date,
            recurring: false,
        }
    }

    fn inv(kind: &str, name: &str, emoji: &str, value: &str, date: NaiveDate) -> InvestmentInput {
        InvestmentInput {
            kind: kind.into(),
            emoji: emoji.into(),
            name: name.into(),
            value: value.into(),
            date,
        }
    }

    fn recompute(l: &Ledger) -> Decimal {
        let mut total = Decimal::ZERO;
        for t in l.transactions() {
            match t.kind {
                TxKind::Income => total += t.amount,
                TxKind::Expense => total -= t.amount,
            }
        }
        for i in l.liquid_investments() {
            total -= i.value;
        }
        for p in l.projects() {
            total -= p.total_invested() - p.project_return();
        }
        total
    }

    /// Scenarios A through D, returning the ledger and the car project id.
    fn scenario_d() -> (Ledger, String, Decimal) {
        let mut l = Ledger::new();
        l.add_transaction(&tx("income", "1000", "Salary", d(2025, 1, 1)))
            .unwrap();
        assert_eq!(l.balance(), Decimal::from(1000));
        l.add_transaction(&tx("expense", "200", "Food", d(2025, 1, 2)))
            .unwrap();
        assert_eq!(l.balance(), Decimal::from(800));
        l.add_investment(&inv("financial", "ETF", "📈", "300", d(2025, 1, 3)))
            .unwrap();
        assert_eq!(l.balance(), Decimal::from(500));
        assert_eq!(l.liquid_investments().len(), 1);

        let before_project = l.balance();
        let car = l
            .add_investment(&inv("material", "Car", "🚗", "5000", d(2025, 2, 1)))
            .unwrap();
        let car_id = car.id().to_string();
        l.add_component(
            &car_id,
            &ComponentInput {
                name: "Parts".into(),
                price: "1000".into(),
                notes: String::new(),
                date: d(2025, 3, 1),
            },
        )
        .unwrap();
        let p = l.project(&car_id).unwrap();
        assert_eq!(p.total_invested(), Decimal::from(6000));
        assert_eq!(p.net_value(), Decimal::from(6000));
        l.set_project_return(&car_id, Decimal::from(4000), d(2025, 6, 1))
            .unwrap();
        assert_eq!(l.project(&car_id).unwrap().net_value(), Decimal::from(2000));
        assert_eq!(l.balance(), before_project - Decimal::from(2000));
        (l, car_id, before_project)
    }

    #[test]
    fn scenarios_a_to_d() {
        let (l, _, _) = scenario_d();
        assert_eq!(l.balance(), Decimal::from(-1500));
        assert_eq!(l.balance(), recompute(&l));
    }

    #[test]
    fn scenario_e_delete_reverses_investment() {
        let (mut l, car_id, _) = scenario_d();
        let before = l.balance();
        let income_before = l.transactions().len();
        let deletion = l.delete_project(&car_id).unwrap();
        assert_eq!(l.balance(), before + Decimal::from(6000));
        assert!(l.projects().is_empty());
        assert_eq!(l.transactions().len(), income_before + 1);
        let ret = l
            .transaction(deletion.return_transaction.as_deref().unwrap())
            .unwrap();
        assert_eq!(ret.kind, TxKind::Income);
        assert_eq!(ret.amount, Decimal::from(4000));
        assert_eq!(ret.category, PROJECT_RETURN_CATEGORY);
        assert_eq!(ret.date, d(2025, 6, 1));
        assert!(l.contributions().is_empty());
    }

    #[test]
    fn delete_without_return_adds_no_income() {
        let mut l = Ledger::new();
        let p = l
            .add_investment(&inv("material", "Kitchen", "🍳", "2500", d(2025, 1, 1)))
            .unwrap();
        let before = l.balance();
        let deletion = l.delete_project(p.id()).unwrap();
        assert_eq!(deletion.return_transaction, None);
        assert!(l.transactions().is_empty());
        assert_eq!(l.balance(), before + Decimal::from(2500));
    }

    #[test]
    fn negative_net_value_raises_balance() {
        let mut l = Ledger::new();
        let p = l
            .add_investment(&inv("material", "Flip", "🏠", "1000", d(2025, 1, 1)))
            .unwrap();
        l.set_project_return(p.id(), Decimal::from(1500), d(2025, 5, 1))
            .unwrap();
        assert_eq!(l.balance(), Decimal::from(500));
        let before = l.balance();
        l.delete_project(p.id()).unwrap();
        assert_eq!(l.balance(), before + Decimal::from(1000));
        assert_eq!(l.balance(), Decimal::from(1500));
    }

    #[test]
    fn same_name_and_emoji_appends_component() {
        let mut l = Ledger::new();
        let first = l
            .add_investment(&inv("material", "Garden", "🌱", "800", d(2025, 1, 1)))
            .unwrap();
        let second = l
            .add_investment(&inv("material", "Garden", "🌱", "200", d(2025, 2, 1)))
            .unwrap();
        assert!(matches!(second, InvestmentOutcome::ComponentAppended { .. }));
        assert_eq!(first.id(), second.id());
        assert_eq!(l.projects().len(), 1);
        let p = &l.projects()[0];
        assert_eq!(p.total_invested(), Decimal::from(1000));
        assert_eq!(p.components()[0].name, "Additional contribution (2025-02-01)");

        // A different emoji opens a separate project.
        l.add_investment(&inv("material", "Garden", "🌳", "50", d(2025, 3, 1)))
            .unwrap();
        assert_eq!(l.projects().len(), 2);
        assert_eq!(l.contributions().len(), 3);
    }

    #[test]
    fn withdraw_to_zero_removes_holding() {
        let mut l = Ledger::new();
        let a = l
            .add_investment(&inv("financial", "BTC", "₿", "100", d(2025, 1, 1)))
            .unwrap();
        let b = l
            .add_investment(&inv("financial", "ETF", "📈", "100", d(2025, 1, 1)))
            .unwrap();
        let r = l.withdraw(a.id(), Decimal::from(100)).unwrap();
        assert!(matches!(r, LiquidUpdate::Removed(_)));
        let r = l.withdraw(b.id(), Decimal::new(9999, 2)).unwrap();
        assert_eq!(r, LiquidUpdate::Updated(Decimal::new(1, 2)));
        assert_eq!(l.liquid_investments().len(), 1);
        assert_eq!(l.liquid_investments()[0].value, Decimal::new(1, 2));
    }

    #[test]
    fn deposit_and_overdraw() {
        let mut l = Ledger::new();
        let a = l
            .add_investment(&inv("financial", "Fund", "", "50", d(2025, 1, 1)))
            .unwrap();
        assert_eq!(l.deposit(a.id(), Decimal::from(25)).unwrap(), Decimal::from(75));
        assert_eq!(l.balance(), Decimal::from(-75));
        assert!(matches!(
            l.withdraw(a.id(), Decimal::from(500)).unwrap(),
            LiquidUpdate::Removed(_)
        ));
        assert_eq!(l.balance(), Decimal::ZERO);
        assert!(l.deposit("missing", Decimal::ONE).is_err());
    }

    #[test]
    fn rejected_input_leaves_ledger_untouched() {
        let mut l = Ledger::new();
        let before = l.clone();
        assert!(l.add_transaction(&tx("income", "-5", "Salary", d(2025, 1, 1))).is_err());
        assert!(l.add_investment(&inv("stock", "X", "", "5", d(2025, 1, 1))).is_err());
        assert!(
            l.set_project_return("missing", Decimal::ONE, d(2025, 1, 1))
                .is_err()
        );
        assert_eq!(l, before);
    }

    #[test]
    fn negative_return_is_rejected() {
        let mut l = Ledger::new();
        let p = l
            .add_investment(&inv("material", "Boat", "⛵", "100", d(2025, 1, 1)))
            .unwrap();
        let err = l
            .set_project_return(p.id(), Decimal::from(-1), d(2025, 1, 2))
            .unwrap_err();
        assert_eq!(err.fields()[0].field, "amount");
        assert_eq!(l.project(p.id()).unwrap().net_value(), Decimal::from(100));
    }

    #[test]
    fn update_and_remove_transaction() {
        let mut l = Ledger::new();
        let id = l
            .add_transaction(&tx("expense", "40", "Food", d(2025, 1, 5)))
            .unwrap();
        l.update_transaction(&id, &tx("expense", "60", "Food", d(2025, 1, 5)))
            .unwrap();
        assert_eq!(l.balance(), Decimal::from(-60));
        assert!(
            l.update_transaction(&id, &tx("expense", "0", "Food", d(2025, 1, 5)))
                .is_err()
        );
        assert_eq!(l.transaction(&id).unwrap().amount, Decimal::from(60));
        l.remove_transaction(&id).unwrap();
        assert_eq!(l.balance(), Decimal::ZERO);
        assert!(matches!(
            l.remove_transaction(&id),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn aggregates_by_month_and_category() {
        let mut l = Ledger::new();
        l.add_transaction(&tx("income", "1000", "Salary", d(2025, 1, 1)))
            .unwrap();
        l.add_transaction(&tx("expense", "120", "Food", d(2025, 1, 10)))
            .unwrap();
        l.add_transaction(&tx("expense", "30", "Food", d(2025, 1, 20)))
            .unwrap();
        l.add_transaction(&tx("expense", "80", "Transport", d(2025, 2, 3)))
            .unwrap();
        assert_eq!(l.monthly_income(2025, 1), Decimal::from(1000));
        assert_eq!(l.monthly_expense(2025, 1), Decimal::from(150));
        assert_eq!(l.monthly_expense(2025, 2), Decimal::from(80));

        let all = l.category_totals(TxKind::Expense, None);
        assert_eq!(all["Food"], Decimal::from(150));
        assert_eq!(all["Transport"], Decimal::from(80));
        let feb = l.category_totals(TxKind::Expense, Some((2025, 2)));
        assert_eq!(feb.len(), 1);

        let summary = l.monthly_summary(12);
        assert_eq!(summary[0].month, "2025-02");
        assert_eq!(summary[1].income, Decimal::from(1000));
    }

    #[test]
    fn balance_at_replays_point_in_time() {
        let (l, _, _) = scenario_d();
        assert_eq!(l.balance_at(d(2024, 12, 31)), Decimal::ZERO);
        assert_eq!(l.balance_at(d(2025, 1, 3)), Decimal::from(500));
        assert_eq!(l.balance_at(d(2025, 2, 1)), Decimal::from(-4500));
        assert_eq!(l.balance_at(d(2025, 3, 1)), Decimal::from(-5500));
        assert_eq!(l.balance_at(d(2030, 1, 1)), l.balance());
    }

    #[test]
    fn balance_is_idempotent() {
        let (l, _, _) = scenario_d();
        assert_eq!(l.balance(), l.balance());
        assert_eq!(compute_balance(&l), l.balance());
    }

    #[test]
    fn oversized_amounts_never_reach_the_balance() {
        let mut l = Ledger::new();
        let huge = "79228162514264337593543950335";
        assert!(matches!(
            l.add_transaction(&tx("income", huge, "Lottery", d(2025, 1, 1))),
            Err(LedgerError::Validation(_))
        ));
        let max = MAX_AMOUNT.to_string();
        for _ in 0..4 {
            l.add_transaction(&tx("income", &max, "Lottery", d(2025, 1, 1)))
                .unwrap();
        }
        assert_eq!(l.balance(), MAX_AMOUNT * Decimal::from(4));
    }

    #[test]
    fn deposit_past_the_limit_is_refused() {
        let mut l = Ledger::new();
        let max = MAX_AMOUNT.to_string();
        let id = l
            .add_investment(&inv("financial", "Vault", "", &max, d(2025, 1, 1)))
            .unwrap()
            .id()
            .to_string();
        let err = l.deposit(&id, Decimal::ONE).unwrap_err();
        assert_eq!(err.fields()[0].field, "amount");
        assert_eq!(l.liquid_investment(&id).unwrap().value, MAX_AMOUNT);
        assert!(l.deposit(&id, Decimal::MAX).is_err());
    }

    #[test]
    fn project_total_past_the_limit_is_refused() {
        let mut l = Ledger::new();
        let max = MAX_AMOUNT.to_string();
        let p = l
            .add_investment(&inv("material", "Tower", "🏢", &max, d(2025, 1, 1)))
            .unwrap();
        let pid = p.id().to_string();
        assert!(
            l.add_investment(&inv("material", "Tower", "🏢", "1", d(2025, 1, 2)))
                .is_err()
        );
        let err = l
            .add_component(
                &pid,
                &ComponentInput {
                    name: "Roof".into(),
                    price: "1".into(),
                    notes: String::new(),
                    date: d(2025, 1, 3),
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        let project = l.project(&pid).unwrap();
        assert!(project.components().is_empty());
        assert_eq!(project.total_invested(), MAX_AMOUNT);
        assert_eq!(l.balance(), -MAX_AMOUNT);
    }

    #[test]
    fn removing_a_holding_releases_its_value() {
        let (mut l, _, _) = scenario_d();
        let before = l.balance();
        let id = l.liquid_investments()[0].id.clone();
        let removed = l.remove_liquid_investment(&id).unwrap();
        assert_eq!(removed.value, Decimal::from(300));
        assert_eq!(l.balance(), before + Decimal::from(300));
        assert!(l.liquid_investment(&id).is_none());
        assert!(matches!(
            l.remove_liquid_investment(&id),
            Err(LedgerError::NotFound {
                entity: Entity::LiquidInvestment,
                ..
            })
        ));
        assert_eq!(l.balance(), recompute(&l));
    }

    #[test]
    fn loaded_records_are_normalised() {
        let date = d(2025, 1, 1);
        let t = |id: &str, kind: TxKind, amount: Decimal| Transaction {
            id: id.into(),
            kind,
            amount,
            category: "Misc".into(),
            description: String::new(),
            date,
            recurring: false,
        };
        let holding = |id: &str, value: Decimal| LiquidInvestment {
            id: id.into(),
            emoji: "📈".into(),
            name: id.into(),
            value,
            date,
            created_at: now(),
        };
        let l = Ledger::from_parts(
            vec![
                t("a", TxKind::Income, Decimal::from(500)),
                t("b", TxKind::Expense, Decimal::from(-200)),
                t("c", TxKind::Income, Decimal::MAX),
            ],
            vec![
                holding("ok", Decimal::from(100)),
                holding("empty", Decimal::ZERO),
                holding("short", Decimal::from(-5)),
            ],
            Vec::new(),
        );
        assert_eq!(l.transaction("b").unwrap().amount, Decimal::ZERO);
        assert_eq!(l.transaction("c").unwrap().amount, Decimal::ZERO);
        assert_eq!(l.liquid_investments().len(), 1);
        assert_eq!(l.liquid_investments()[0].id, "ok");
        assert_eq!(l.balance(), Decimal::from(400));
    }
}
