// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sapo::{
    Ledger, LedgerError, cli,
    commands::{investments, projects},
    ledger::InvestmentOutcome,
    models::{PROJECT_RETURN_CATEGORY, TxKind},
    session::Tracker,
    storage::{DEFAULT_STORAGE_KEY, MemoryStore},
    validate::{ComponentInput, InvestmentInput, TransactionInput},
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run(tracker: &mut Tracker<MemoryStore>, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    match matches.subcommand() {
        Some(("invest", m)) => investments::handle(tracker, m),
        Some(("project", m)) => projects::handle(tracker, m),
        _ => panic!("unexpected subcommand"),
    }
}

fn project(name: &str, value: &str, date: NaiveDate) -> InvestmentInput {
    InvestmentInput {
        kind: "material".into(),
        emoji: "🔧".into(),
        name: name.into(),
        value: value.into(),
        date,
    }
}

#[test]
fn car_project_lifecycle_through_cli() {
    let mut tracker = Tracker::open(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    tracker
        .apply(|l| {
            l.add_transaction(&TransactionInput {
                kind: "income".into(),
                amount: "1000".into(),
                category: "Salary".into(),
                description: String::new(),
                date: d(2025, 1, 1),
                recurring: true,
            })
        })
        .unwrap();
    let before_project = tracker.ledger().balance();

    run(
        &mut tracker,
        &[
            "sapo", "invest", "add", "--kind", "material", "--name", "Car", "--emoji", "🚗",
            "--value", "5000", "--date", "2025-02-01",
        ],
    )
    .unwrap();
    let car_id = tracker.ledger().projects()[0].id.clone();
    run(
        &mut tracker,
        &[
            "sapo", "project", "add-component", "--project", &car_id, "--name", "Parts",
            "--price", "1000", "--date", "2025-03-01",
        ],
    )
    .unwrap();
    run(
        &mut tracker,
        &[
            "sapo", "project", "return", "--project", &car_id, "--amount", "4000", "--date",
            "2025-06-01",
        ],
    )
    .unwrap();

    let car = tracker.ledger().project(&car_id).unwrap();
    assert_eq!(car.total_invested(), Decimal::from(6000));
    assert_eq!(car.net_value(), Decimal::from(2000));
    assert_eq!(
        tracker.ledger().balance(),
        before_project - Decimal::from(2000)
    );

    let before_delete = tracker.ledger().balance();
    run(&mut tracker, &["sapo", "project", "rm", "--project", &car_id]).unwrap();
    assert_eq!(
        tracker.ledger().balance(),
        before_delete + Decimal::from(6000)
    );
    assert!(tracker.ledger().projects().is_empty());
    let ret = tracker
        .ledger()
        .transactions()
        .iter()
        .find(|t| t.category == PROJECT_RETURN_CATEGORY)
        .unwrap();
    assert_eq!(ret.kind, TxKind::Income);
    assert_eq!(ret.amount, Decimal::from(4000));
}

#[test]
fn deletion_releases_total_invested_for_any_return() {
    let returns = ["0", "1", "2999.99", "3000", "4500.50"];
    for r in returns {
        let mut l = Ledger::new();
        let out = l.add_investment(&project("Roof", "2000", d(2025, 1, 1))).unwrap();
        let id = out.id().to_string();
        l.add_component(
            &id,
            &ComponentInput {
                name: "Tiles".into(),
                price: "1000".into(),
                notes: "grey".into(),
                date: d(2025, 1, 15),
            },
        )
        .unwrap();
        let ret: Decimal = r.parse().unwrap();
        l.set_project_return(&id, ret, d(2025, 4, 1)).unwrap();
        let p = l.project(&id).unwrap();
        assert_eq!(p.net_value(), p.total_invested() - p.project_return());

        let incomes_before = l.transactions().len();
        let before = l.balance();
        let deletion = l.delete_project(&id).unwrap();
        assert_eq!(l.balance(), before + Decimal::from(3000), "return {}", r);
        if ret > Decimal::ZERO {
            assert_eq!(l.transactions().len(), incomes_before + 1);
            let tx = l
                .transaction(deletion.return_transaction.as_deref().unwrap())
                .unwrap();
            assert_eq!(tx.amount, ret);
            assert_eq!(tx.date, d(2025, 4, 1));
        } else {
            assert!(deletion.return_transaction.is_none());
            assert_eq!(l.transactions().len(), incomes_before);
        }
    }
}

#[test]
fn project_with_return_still_accepts_components() {
    let mut l = Ledger::new();
    let id = l
        .add_investment(&project("Shed", "500", d(2025, 1, 1)))
        .unwrap()
        .id()
        .to_string();
    l.set_project_return(&id, Decimal::from(800), d(2025, 2, 1))
        .unwrap();
    assert_eq!(l.project(&id).unwrap().net_value(), Decimal::from(-300));
    let again = l.add_investment(&project("Shed", "100", d(2025, 3, 1))).unwrap();
    assert!(matches!(again, InvestmentOutcome::ComponentAppended { .. }));
    let p = l.project(&id).unwrap();
    assert_eq!(p.total_invested(), Decimal::from(600));
    assert_eq!(p.net_value(), Decimal::from(-200));
    assert_eq!(l.balance(), Decimal::from(200));
}

#[test]
fn component_removal_via_cli() {
    let mut tracker = Tracker::open(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    let id = tracker
        .apply(|l| l.add_investment(&project("Bike", "300", d(2025, 1, 1))))
        .unwrap()
        .id()
        .to_string();
    let component_id = tracker
        .apply(|l| {
            l.add_component(
                &id,
                &ComponentInput {
                    name: "Wheels".into(),
                    price: "120".into(),
                    notes: String::new(),
                    date: d(2025, 1, 5),
                },
            )
        })
        .unwrap();
    run(
        &mut tracker,
        &[
            "sapo", "project", "rm-component", "--project", &id, "--component", &component_id,
        ],
    )
    .unwrap();
    let p = tracker.ledger().project(&id).unwrap();
    assert_eq!(p.total_invested(), Decimal::from(300));
    assert!(p.components().is_empty());

    let err = run(
        &mut tracker,
        &["sapo", "project", "return", "--project", "missing", "--amount", "5"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Project 'missing' not found"));
}

#[test]
fn liquid_withdraw_boundary_via_cli() {
    let mut tracker = Tracker::open(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    run(
        &mut tracker,
        &[
            "sapo", "invest", "add", "--kind", "financial", "--name", "ETF", "--value", "300",
            "--date", "2025-01-03",
        ],
    )
    .unwrap();
    let id = tracker.ledger().liquid_investments()[0].id.clone();
    assert_eq!(tracker.ledger().balance(), Decimal::from(-300));

    run(
        &mut tracker,
        &["sapo", "invest", "withdraw", "--id", &id, "--amount", "299.99"],
    )
    .unwrap();
    assert_eq!(
        tracker.ledger().liquid_investments()[0].value,
        Decimal::new(1, 2)
    );
    run(
        &mut tracker,
        &["sapo", "invest", "withdraw", "--id", &id, "--amount", "0.01"],
    )
    .unwrap();
    assert!(tracker.ledger().liquid_investments().is_empty());
    assert_eq!(tracker.ledger().balance(), Decimal::ZERO);
}

#[test]
fn invest_rm_releases_the_holding() {
    let mut tracker = Tracker::open(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    run(
        &mut tracker,
        &[
            "sapo", "invest", "add", "--kind", "financial", "--name", "Bonds", "--value", "120",
            "--date", "2025-02-01",
        ],
    )
    .unwrap();
    let id = tracker.ledger().liquid_investments()[0].id.clone();
    assert_eq!(tracker.ledger().balance(), Decimal::from(-120));

    run(&mut tracker, &["sapo", "invest", "rm", "--id", &id]).unwrap();
    assert!(tracker.ledger().liquid_investments().is_empty());
    assert_eq!(tracker.ledger().balance(), Decimal::ZERO);

    let err = run(&mut tracker, &["sapo", "invest", "rm", "--id", &id]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound { .. })
    ));
}

#[test]
fn malformed_amount_flags_are_field_errors() {
    let mut tracker = Tracker::open(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    run(
        &mut tracker,
        &[
            "sapo", "invest", "add", "--kind", "financial", "--name", "ETF", "--value", "50",
        ],
    )
    .unwrap();
    let id = tracker.ledger().liquid_investments()[0].id.clone();
    let pid = tracker
        .apply(|l| l.add_investment(&project("Shed", "80", d(2025, 1, 1))))
        .unwrap()
        .id()
        .to_string();

    for args in [
        vec!["sapo", "invest", "deposit", "--id", id.as_str(), "--amount", "abc"],
        vec!["sapo", "invest", "withdraw", "--id", id.as_str(), "--amount", "1,5"],
        vec!["sapo", "project", "return", "--project", pid.as_str(), "--amount", "lots"],
    ] {
        let err = run(&mut tracker, &args).unwrap_err();
        let fields: Vec<&str> = err
            .downcast_ref::<LedgerError>()
            .map(|e| e.fields().iter().map(|f| f.field).collect())
            .unwrap_or_default();
        assert_eq!(fields, vec!["amount"], "{:?}", args);
    }
    assert_eq!(tracker.ledger().liquid_investments()[0].value, Decimal::from(50));
    assert_eq!(tracker.ledger().balance(), Decimal::from(-130));
}
