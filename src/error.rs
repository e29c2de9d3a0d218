// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Transaction,
    LiquidInvestment,
    Project,
    Component,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Entity::Transaction => "Transaction",
            Entity::LiquidInvestment => "Investment",
            Entity::Project => "Project",
            Entity::Component => "Component",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid input: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: Entity, id: String },

    #[error(
        "Removing component '{component_id}' would leave project '{project_id}' with negative total invested ({remaining})"
    )]
    Inconsistent {
        project_id: String,
        component_id: String,
        remaining: Decimal,
    },
}

impl LedgerError {
    pub fn not_found(entity: Entity, id: &str) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        LedgerError::Validation(vec![FieldError::new(field, message)])
    }

    /// Fields rejected by validation; empty for other variants.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            LedgerError::Validation(v) => v,
            _ => &[],
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Load,
    Save,
}

impl fmt::Display for PersistOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistOp::Load => f.write_str("load"),
            PersistOp::Save => f.write_str("save"),
        }
    }
}

/// Storage failure that did not stop the in-memory operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{op} failed: {message}")]
pub struct PersistenceWarning {
    pub op: PersistOp,
    pub message: String,
}
