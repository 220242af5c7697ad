// 📒 Ledger Store - pure state transitions over immutable snapshots
//
// Every operation takes the current snapshot by reference and returns a NEW
// snapshot. A rejected operation returns an error and the caller keeps the
// snapshot it already holds, so "no effect" is the failure mode everywhere.

use crate::clock::{format_date, Clock};
use crate::models::{Person, Transaction, TransactionKind};
use thiserror::Error;

// ============================================================================
// REJECTIONS
// ============================================================================

/// Why an operation had no effect. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("person name is empty")]
    EmptyName,

    #[error("a person named '{0}' already exists")]
    DuplicateName(String),

    #[error("'{0}' is not a whole number")]
    InvalidAmount(String),

    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(i64),

    #[error("no person named '{0}'")]
    UnknownPerson(String),

    #[error("balance of '{0}' would overflow")]
    BalanceOverflow(String),
}

/// Parse the raw amount text typed by the user.
///
/// Surrounding whitespace is trimmed before parsing, so `" 250 "` is accepted.
/// Only strictly positive whole numbers are accepted.
pub fn parse_amount(raw: &str) -> Result<i64, LedgerError> {
    let trimmed = raw.trim();
    let amount: i64 = trimmed
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(trimmed.to_string()))?;

    if amount <= 0 {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    Ok(amount)
}

// ============================================================================
// LEDGER SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pub persons: Vec<Person>,
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(persons: Vec<Person>, transactions: Vec<Transaction>) -> Self {
        Ledger {
            persons,
            transactions,
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn person(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.name == name)
    }

    /// Sum of all balances, recomputed on every call.
    ///
    /// Summed as i128: individual balances fit i64, their sum may not.
    pub fn total_balance(&self) -> i128 {
        self.persons.iter().map(|p| i128::from(p.balance)).sum()
    }

    /// History of one person, in insertion order
    pub fn transactions_for(&self, name: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.person_name == name)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Append a person with balance 0. The name is trimmed first.
    pub fn add_person(&self, raw_name: &str) -> Result<Ledger, LedgerError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if self.person(name).is_some() {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }

        let mut persons = self.persons.clone();
        persons.push(Person::new(name, 0));

        Ok(Ledger {
            persons,
            transactions: self.transactions.clone(),
        })
    }

    /// Money In: raise the balance and record a positive transaction
    pub fn credit(
        &self,
        name: &str,
        amount: i64,
        clock: &dyn Clock,
    ) -> Result<Ledger, LedgerError> {
        self.adjust(name, TransactionKind::MoneyIn, amount, clock)
    }

    /// Money Out: lower the balance (no floor) and record a negative transaction
    pub fn debit(
        &self,
        name: &str,
        amount: i64,
        clock: &dyn Clock,
    ) -> Result<Ledger, LedgerError> {
        self.adjust(name, TransactionKind::MoneyOut, amount, clock)
    }

    /// Remove the person and every transaction carrying its name.
    ///
    /// Deleting a name that is not present has no effect (`UnknownPerson`).
    pub fn delete_person(&self, name: &str) -> Result<Ledger, LedgerError> {
        if self.person(name).is_none() {
            return Err(LedgerError::UnknownPerson(name.to_string()));
        }

        Ok(Ledger {
            persons: self
                .persons
                .iter()
                .filter(|p| p.name != name)
                .cloned()
                .collect(),
            transactions: self
                .transactions
                .iter()
                .filter(|tx| tx.person_name != name)
                .cloned()
                .collect(),
        })
    }

    fn adjust(
        &self,
        name: &str,
        kind: TransactionKind,
        amount: i64,
        clock: &dyn Clock,
    ) -> Result<Ledger, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount(amount));
        }

        let current = self
            .person(name)
            .ok_or_else(|| LedgerError::UnknownPerson(name.to_string()))?;
        let delta = kind.signed(amount);
        let balance = current
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::BalanceOverflow(name.to_string()))?;

        let persons = self
            .persons
            .iter()
            .map(|p| {
                if p.name == name {
                    Person::new(p.name.clone(), balance)
                } else {
                    p.clone()
                }
            })
            .collect();

        let mut transactions = self.transactions.clone();
        transactions.push(Transaction::new(
            name,
            kind,
            amount,
            format_date(clock.today()),
        ));

        Ok(Ledger {
            persons,
            transactions,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
