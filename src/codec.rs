// 🧾 Flat Codec - delimited text persistence format
//
//   persons      → name,balance;name,balance
//   transactions → personName,amount,type,date;...
//
// There is no escaping. A field containing ',' or ';' is written verbatim and the
// record is mangled on the next load. Encoding logs a warning when that happens.

use crate::models::{Person, Transaction};
use tracing::{debug, warn};

pub const FIELD_DELIMITER: char = ',';
pub const RECORD_DELIMITER: char = ';';

const PERSON_FIELDS: usize = 2;
const TRANSACTION_FIELDS: usize = 4;

// ============================================================================
// ENCODING
// ============================================================================

pub fn encode_persons(persons: &[Person]) -> String {
    persons
        .iter()
        .map(|p| {
            warn_on_delimiter("person.name", &p.name);
            format!("{}{}{}", p.name, FIELD_DELIMITER, p.balance)
        })
        .collect::<Vec<_>>()
        .join(RECORD_DELIMITER.to_string().as_str())
}

pub fn encode_transactions(transactions: &[Transaction]) -> String {
    transactions
        .iter()
        .map(|tx| {
            warn_on_delimiter("transaction.person_name", &tx.person_name);
            warn_on_delimiter("transaction.type", &tx.kind);
            warn_on_delimiter("transaction.date", &tx.date);
            format!(
                "{name}{sep}{amount}{sep}{kind}{sep}{date}",
                name = tx.person_name,
                amount = tx.amount,
                kind = tx.kind,
                date = tx.date,
                sep = FIELD_DELIMITER,
            )
        })
        .collect::<Vec<_>>()
        .join(RECORD_DELIMITER.to_string().as_str())
}

/// True if the value can be encoded without breaking record structure
pub fn is_encodable(value: &str) -> bool {
    !value.contains(FIELD_DELIMITER) && !value.contains(RECORD_DELIMITER)
}

fn warn_on_delimiter(field: &str, value: &str) {
    if !is_encodable(value) {
        warn!(field, value, "value contains a delimiter; record will not load back intact");
    }
}

// ============================================================================
// DECODING
// ============================================================================

/// Malformed records are dropped; the rest load in their stored order.
pub fn decode_persons(encoded: &str) -> Vec<Person> {
    decode_records(encoded, PERSON_FIELDS, |parts| {
        let balance = parts[1].parse::<i64>().ok()?;
        Some(Person::new(parts[0], balance))
    })
}

/// Same rules as persons. `type` and `date` are not validated.
pub fn decode_transactions(encoded: &str) -> Vec<Transaction> {
    decode_records(encoded, TRANSACTION_FIELDS, |parts| {
        let amount = parts[1].parse::<i64>().ok()?;
        Some(Transaction {
            person_name: parts[0].to_string(),
            amount,
            kind: parts[2].to_string(),
            date: parts[3].to_string(),
        })
    })
}

fn decode_records<T>(
    encoded: &str,
    field_count: usize,
    build: impl Fn(&[&str]) -> Option<T>,
) -> Vec<T> {
    if encoded.is_empty() {
        return Vec::new();
    }

    let mut dropped = 0usize;
    let records: Vec<T> = encoded
        .split(RECORD_DELIMITER)
        .filter_map(|record| {
            let parts: Vec<&str> = record.split(FIELD_DELIMITER).collect();
            let decoded = if parts.len() == field_count {
                build(&parts)
            } else {
                None
            };
            if decoded.is_none() {
                dropped += 1;
                debug!(record, "dropping malformed record");
            }
            decoded
        })
        .collect();

    if dropped > 0 {
        debug!(dropped, kept = records.len(), "decoded with malformed records");
    }

    records
}

// ============================================================================
// TESTS
// ============================================================================
