// ⚙️ Configuration - JSON file + environment overrides

use crate::storage::DEFAULT_NAMESPACE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MONEY_MANAGER_CONFIG";
pub const DB_ENV: &str = "MONEY_MANAGER_DB";
pub const ADDR_ENV: &str = "MONEY_MANAGER_ADDR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding the preferences table
    pub db_path: PathBuf,

    /// Preferences namespace inside the database
    pub namespace: String,

    /// Storage keys for the two encoded lists
    pub persons_key: String,
    pub transactions_key: String,

    /// Shown in front of every amount ("Rs 300")
    pub currency_label: String,

    /// Listen address for the API server
    pub server_addr: String,

    /// Where the terminal UI writes its logs
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from("money_manager.db"),
            namespace: DEFAULT_NAMESPACE.to_string(),
            persons_key: "persons".to_string(),
            transactions_key: "transactions".to_string(),
            currency_label: "Rs".to_string(),
            server_addr: "0.0.0.0:3000".to_string(),
            log_file: PathBuf::from("money_manager.log"),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// File named by `MONEY_MANAGER_CONFIG` (if any), then env overrides
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(db) = lookup(DB_ENV) {
            self.db_path = PathBuf::from(db);
        }
        if let Some(addr) = lookup(ADDR_ENV) {
            self.server_addr = addr;
        }
    }

    /// Format an amount for display, e.g. `Rs -40`
    pub fn money(&self, amount: impl Into<i128>) -> String {
        format!("{} {}", self.currency_label, amount.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.namespace, "money_manager");
        assert_eq!(config.persons_key, "persons");
        assert_eq!(config.transactions_key, "transactions");
        assert_eq!(config.money(300), "Rs 300");
        assert_eq!(
            config.money(i128::from(i64::MAX) + 1),
            "Rs 9223372036854775808"
        );
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "currency_label": "EUR", "db_path": "/tmp/ledger.db" }}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.currency_label, "EUR");
        assert_eq!(config.db_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.persons_key, "persons");
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [(DB_ENV, "/data/m.db"), (ADDR_ENV, "127.0.0.1:8080")]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();

        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/data/m.db"));
        assert_eq!(config.server_addr, "127.0.0.1:8080");
    }
}
