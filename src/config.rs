// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration resolved from the environment.

use anyhow::Result;
use std::path::PathBuf;

use crate::db::default_db_path;
use crate::storage::DEFAULT_STORAGE_KEY;

pub const ENV_DB: &str = "SAPO_DB";
pub const ENV_STORAGE_KEY: &str = "SAPO_STORAGE_KEY";
pub const ENV_LOG: &str = "SAPO_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub storage_key: String,
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let db_path = match non_empty(ENV_DB) {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };
        Ok(Config {
            db_path,
            storage_key: non_empty(ENV_STORAGE_KEY)
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            log_filter: non_empty(ENV_LOG).unwrap_or_else(|| "warn".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_values_override_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB, "/tmp/sapo-test.sqlite"),
            (ENV_STORAGE_KEY, " household "),
            (ENV_LOG, "sapo=debug"),
        ]);
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/sapo-test.sqlite"));
        assert_eq!(cfg.storage_key, "household");
        assert_eq!(cfg.log_filter, "sapo=debug");
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = Config::from_lookup(|k| match k {
            ENV_DB => Some("/tmp/x.sqlite".to_string()),
            _ => Some("   ".to_string()),
        })
        .unwrap();
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.log_filter, "warn");
    }
}
