//! Property-based tests for the ledger laws
//!
//! - Round trip: decode(encode(xs)) == xs for delimiter-free values
//! - Credit then debit of the same amount restores the balance
//! - Delete lowers the total by exactly the deleted balance
//! - Malformed records are dropped without disturbing the others
//! - Rejected changes leave the snapshot untouched

use chrono::NaiveDate;
use money_manager::{
    decode_persons, decode_transactions, encode_persons, encode_transactions, Change, FixedClock,
    Ledger, LedgerError, LedgerStore, MemoryStore, Person, StorageKeys, Transaction,
    TransactionKind,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
}

/// Names without ',' or ';' and without surrounding whitespace
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,14}[A-Za-z0-9]"
}

fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::MoneyIn), Just(TransactionKind::MoneyOut)]
}

fn person_strategy() -> impl Strategy<Value = Person> {
    (name_strategy(), any::<i64>()).prop_map(|(name, balance)| Person::new(name, balance))
}

fn transaction_strategy() -> impl Strategy<Value = Transaction> {
    (
        name_strategy(),
        kind_strategy(),
        1i64..=i64::MAX,
        "20[0-9]{2}-[01][0-9]-[0-3][0-9]",
    )
        .prop_map(|(name, kind, amount, date)| Transaction::new(name, kind, amount, date))
}

/// Distinct persons with balances small enough that no credit overflows
fn ledger_strategy() -> impl Strategy<Value = Ledger> {
    prop::collection::btree_set(name_strategy(), 1..8)
        .prop_flat_map(|names: BTreeSet<String>| {
            let count = names.len();
            (
                Just(names),
                prop::collection::vec(-1_000_000_000i64..1_000_000_000, count),
            )
        })
        .prop_map(|(names, balances)| {
            let persons = names
                .into_iter()
                .zip(balances)
                .map(|(name, balance)| Person::new(name, balance))
                .collect();
            Ledger::new(persons, Vec::new())
        })
}

/// Records that can never decode: wrong field count or a non-numeric number
fn bad_record_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z]{1,8}",
        "[A-Za-z]{1,8},[a-z]{1,5}",
        "[A-Za-z]{1,4},1,2,3,4,5",
    ]
}

proptest! {
    #[test]
    fn prop_persons_round_trip(persons in prop::collection::vec(person_strategy(), 0..20)) {
        prop_assert_eq!(decode_persons(&encode_persons(&persons)), persons);
    }

    #[test]
    fn prop_transactions_round_trip(txs in prop::collection::vec(transaction_strategy(), 0..20)) {
        prop_assert_eq!(decode_transactions(&encode_transactions(&txs)), txs);
    }

    #[test]
    fn prop_credit_then_debit_restores_balance(
        ledger in ledger_strategy(),
        pick in any::<prop::sample::Index>(),
        amount in 1i64..1_000_000_000,
    ) {
        let name = ledger.persons[pick.index(ledger.persons.len())].name.clone();

        let after = ledger
            .credit(&name, amount, &clock())
            .and_then(|l| l.debit(&name, amount, &clock()))
            .unwrap();

        prop_assert_eq!(&after.persons, &ledger.persons);
        prop_assert_eq!(after.total_balance(), ledger.total_balance());

        let history = after.transactions_for(&name);
        prop_assert_eq!(history.len(), 2);
        prop_assert_eq!(history.iter().map(|t| t.amount).sum::<i64>(), 0);
    }

    #[test]
    fn prop_delete_lowers_total_by_balance(
        ledger in ledger_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let victim = ledger.persons[pick.index(ledger.persons.len())].clone();
        let ledger = ledger.credit(&victim.name, 5, &clock()).unwrap();
        let balance = ledger.person(&victim.name).unwrap().balance;

        let after = ledger.delete_person(&victim.name).unwrap();

        prop_assert_eq!(after.total_balance(), ledger.total_balance() - i128::from(balance));
        prop_assert!(after.person(&victim.name).is_none());
        prop_assert!(after.transactions_for(&victim.name).is_empty());
        prop_assert_eq!(after.persons.len(), ledger.persons.len() - 1);
    }

    #[test]
    fn prop_one_bad_record_among_many(
        persons in prop::collection::vec(person_strategy(), 1..12),
        bad in bad_record_strategy(),
        at in any::<prop::sample::Index>(),
    ) {
        let mut records: Vec<String> = persons
            .iter()
            .map(|p| encode_persons(std::slice::from_ref(p)))
            .collect();
        records.insert(at.index(records.len() + 1), bad);

        prop_assert_eq!(decode_persons(&records.join(";")), persons);
    }

    #[test]
    fn prop_duplicate_add_is_rejected(
        ledger in ledger_strategy(),
        pick in any::<prop::sample::Index>(),
        pad in "[ ]{0,3}",
    ) {
        let name = ledger.persons[pick.index(ledger.persons.len())].name.clone();
        let padded = format!("{}{}{}", pad, name, pad);

        prop_assert_eq!(
            ledger.add_person(&padded),
            Err(LedgerError::DuplicateName(name))
        );
    }

    #[test]
    fn prop_rejected_changes_write_nothing(
        ledger in ledger_strategy(),
        raw in prop_oneof!["-[0-9]{1,6}", Just("0".to_string()), "[a-z]{1,6}", "[0-9]+\\.[0-9]+"],
    ) {
        let storage = MemoryStore::with_entries([
            ("persons", encode_persons(&ledger.persons)),
            ("transactions", String::new()),
        ]);
        let mut store = LedgerStore::open(storage, Box::new(clock()), StorageKeys::default()).unwrap();
        let name = ledger.persons[0].name.clone();

        prop_assert!(!store.money_in(&name, &raw).unwrap().is_applied());
        prop_assert!(!store.money_out(&name, &raw).unwrap().is_applied());
        prop_assert_eq!(
            store.delete_person("no such person;").unwrap(),
            Change::Ignored(LedgerError::UnknownPerson("no such person;".to_string()))
        );

        prop_assert_eq!(store.ledger(), &ledger);
        prop_assert!(store.ledger().transactions.is_empty());
    }
}
