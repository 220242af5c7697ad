// 📤 CSV export of the transaction history

use crate::models::Transaction;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    person: &'a str,
    amount: i64,
    #[serde(rename = "type")]
    kind: &'a str,
    date: &'a str,
}

/// Write `person,amount,type,date` rows, header first. Returns the row count.
pub fn export_transactions_csv<'a, I, W>(transactions: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a Transaction>,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    let mut written = 0;

    for tx in transactions {
        wtr.serialize(CsvRow {
            person: &tx.person_name,
            amount: tx.amount,
            kind: &tx.kind,
            date: &tx.date,
        })
        .context("Failed to write CSV row")?;
        written += 1;
    }

    if written == 0 {
        // serialize() emits the header lazily; write it for empty exports too
        wtr.write_record(["person", "amount", "type", "date"])
            .context("Failed to write CSV header")?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    #[test]
    fn test_export_rows() {
        let txs = vec![
            Transaction::new("Alice", TransactionKind::MoneyIn, 500, "2026-10-17"),
            Transaction::new("Smith, John", TransactionKind::MoneyOut, 20, "2026-10-18"),
        ];
        let mut out = Vec::new();

        let count = export_transactions_csv(&txs, &mut out).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "person,amount,type,date\n\
             Alice,500,Money In,2026-10-17\n\
             \"Smith, John\",-20,Money Out,2026-10-18\n"
        );
    }

    #[test]
    fn test_export_empty_has_header() {
        let mut out = Vec::new();

        let count = export_transactions_csv(&Vec::<Transaction>::new(), &mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "person,amount,type,date\n");
    }
}
