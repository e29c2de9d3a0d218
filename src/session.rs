// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! A ledger paired with the store it is saved to.

use tracing::{info, warn};

use crate::error::{LedgerError, PersistOp, PersistenceWarning};
use crate::ledger::Ledger;
use crate::storage::{self, KeyValueStore};

pub struct Tracker<S: KeyValueStore> {
    ledger: Ledger,
    store: S,
    key: String,
    warnings: Vec<PersistenceWarning>,
    /// Payload that failed to load, still to be copied aside.
    unreadable: Option<String>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads whatever is stored under `key`. A missing entry starts an empty
    /// ledger; an unreadable one does too, with a warning recorded. The
    /// unreadable payload is copied to [`storage::unreadable_key`] before the
    /// first save replaces it.
    pub fn open(store: S, key: &str) -> Self {
        let mut warnings = Vec::new();
        let mut unreadable = None;
        let loaded = store
            .get(key)
            .and_then(|raw| match raw {
                Some(raw) => match storage::decode_ledger(&raw) {
                    Ok(l) => Ok(l),
                    Err(e) => {
                        unreadable = Some(raw);
                        Err(e)
                    }
                },
                None => Ok(None),
            });
        let ledger = match loaded {
            Ok(Some(l)) => l,
            Ok(None) => Ledger::new(),
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(error = %message, "could not load ledger, starting empty");
                warnings.push(PersistenceWarning {
                    op: PersistOp::Load,
                    message,
                });
                Ledger::new()
            }
        };
        Tracker {
            ledger,
            store,
            key: key.to_string(),
            warnings,
            unreadable,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn warnings(&self) -> &[PersistenceWarning] {
        &self.warnings
    }

    /// Runs one mutation and saves on success.
    ///
    /// A failed save is logged and recorded; the mutation stays applied.
    pub fn apply<T>(
        &mut self,
        op: impl FnOnce(&mut Ledger) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let out = op(&mut self.ledger)?;
        self.persist();
        Ok(out)
    }

    fn persist(&mut self) {
        if let Some(raw) = self.unreadable.take() {
            let aside = storage::unreadable_key(&self.key);
            if let Err(e) = self.store.set(&aside, &raw) {
                let message = format!("{:#}", e);
                warn!(
                    error = %message,
                    "could not copy unreadable ledger aside, not saving over it"
                );
                self.warnings.push(PersistenceWarning {
                    op: PersistOp::Save,
                    message: format!("unreadable ledger left in place: {}", message),
                });
                self.unreadable = Some(raw);
                return;
            }
            info!(key = %aside, "unreadable ledger copied aside");
        }
        if let Err(e) = storage::save(&self.store, &self.key, &self.ledger) {
            let message = format!("{:#}", e);
            warn!(error = %message, "ledger save failed, continuing in memory");
            self.warnings.push(PersistenceWarning {
                op: PersistOp::Save,
                message,
            });
        }
    }
}
