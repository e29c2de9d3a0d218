// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod project;
pub mod session;
pub mod storage;
pub mod utils;
pub mod validate;

pub use error::{LedgerError, PersistenceWarning};
pub use ledger::{Ledger, compute_balance};
pub use project::Project;
pub use session::Tracker;
