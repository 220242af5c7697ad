// 🔁 Ledger State Container
//
// Holds the "current" snapshot for a front end. Every accepted transition is
// persisted synchronously and only then replaces the snapshot (the on-mutation
// hook). Rejected transitions and failed saves leave both untouched.

use crate::clock::Clock;
use crate::codec::{decode_persons, decode_transactions, encode_persons, encode_transactions};
use crate::config::AppConfig;
use crate::ledger::{parse_amount, Ledger, LedgerError};
use crate::models::{Person, Transaction};
use crate::storage::KeyValueStore;
use anyhow::Result;
use tracing::{debug, info};

/// Storage keys for the two persisted lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub persons: String,
    pub transactions: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageKeys {
            persons: "persons".to_string(),
            transactions: "transactions".to_string(),
        }
    }
}

impl From<&AppConfig> for StorageKeys {
    fn from(config: &AppConfig) -> Self {
        StorageKeys {
            persons: config.persons_key.clone(),
            transactions: config.transactions_key.clone(),
        }
    }
}

/// Result of a requested change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Applied,
    Ignored(LedgerError),
}

impl Change {
    pub fn is_applied(&self) -> bool {
        matches!(self, Change::Applied)
    }
}

pub type MutationObserver = Box<dyn FnMut(&Ledger) + Send>;

pub struct LedgerStore<S: KeyValueStore> {
    ledger: Ledger,
    storage: S,
    clock: Box<dyn Clock + Send + Sync>,
    keys: StorageKeys,
    observers: Vec<MutationObserver>,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Read both lists once; absent entries load as empty lists
    pub fn open(storage: S, clock: Box<dyn Clock + Send + Sync>, keys: StorageKeys) -> Result<Self> {
        let persons = decode_persons(&storage.get(&keys.persons)?.unwrap_or_default());
        let transactions =
            decode_transactions(&storage.get(&keys.transactions)?.unwrap_or_default());

        info!(
            persons = persons.len(),
            transactions = transactions.len(),
            "ledger loaded"
        );

        Ok(LedgerStore {
            ledger: Ledger::new(persons, transactions),
            storage,
            clock,
            keys,
            observers: Vec::new(),
        })
    }

    /// Register a callback run after every persisted change
    pub fn on_mutation(&mut self, observer: MutationObserver) {
        self.observers.push(observer);
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn persons(&self) -> &[Person] {
        &self.ledger.persons
    }

    pub fn transactions_for(&self, name: &str) -> Vec<&Transaction> {
        self.ledger.transactions_for(name)
    }

    pub fn total_balance(&self) -> i128 {
        self.ledger.total_balance()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ------------------------------------------------------------------------
    // Changes
    // ------------------------------------------------------------------------

    pub fn add_person(&mut self, raw_name: &str) -> Result<Change> {
        let next = self.ledger.add_person(raw_name);
        self.commit("add_person", next)
    }

    /// `raw_amount` is the text typed by the user
    pub fn money_in(&mut self, name: &str, raw_amount: &str) -> Result<Change> {
        let next = parse_amount(raw_amount)
            .and_then(|amount| self.ledger.credit(name, amount, self.clock.as_ref()));
        self.commit("money_in", next)
    }

    pub fn money_out(&mut self, name: &str, raw_amount: &str) -> Result<Change> {
        let next = parse_amount(raw_amount)
            .and_then(|amount| self.ledger.debit(name, amount, self.clock.as_ref()));
        self.commit("money_out", next)
    }

    pub fn delete_person(&mut self, name: &str) -> Result<Change> {
        let next = self.ledger.delete_person(name);
        self.commit("delete_person", next)
    }

    fn commit(&mut self, op: &str, next: Result<Ledger, LedgerError>) -> Result<Change> {
        match next {
            Ok(ledger) => {
                self.persist(&ledger)?;
                self.ledger = ledger;
                info!(
                    op,
                    persons = self.ledger.persons.len(),
                    transactions = self.ledger.transactions.len(),
                    total = self.ledger.total_balance(),
                    "change applied"
                );
                for observer in self.observers.iter_mut() {
                    observer(&self.ledger);
                }
                Ok(Change::Applied)
            }
            Err(reason) => {
                debug!(op, %reason, "change ignored");
                Ok(Change::Ignored(reason))
            }
        }
    }

    /// Write both encoded lists of `ledger` in one batch
    fn persist(&mut self, ledger: &Ledger) -> Result<()> {
        let persons = encode_persons(&ledger.persons);
        let transactions = encode_transactions(&ledger.transactions);
        self.storage.set_many(&[
            (self.keys.persons.as_str(), persons.as_str()),
            (self.keys.transactions.as_str(), transactions.as_str()),
        ])
    }
}

// ============================================================================
// TESTS
// ============================================================================
