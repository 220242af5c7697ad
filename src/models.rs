// 👤 Domain Records - Person + Transaction
//
// A Person is identified by its name (no surrogate id).
// A Transaction points at its Person by name only; it is never owned by it.

use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION KIND
// ============================================================================

/// The two labels a transaction is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Credit: balance goes up, amount is stored positive
    MoneyIn,

    /// Debit: balance goes down, amount is stored negative
    MoneyOut,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::MoneyIn => "Money In",
            TransactionKind::MoneyOut => "Money Out",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Money In" => Some(TransactionKind::MoneyIn),
            "Money Out" => Some(TransactionKind::MoneyOut),
            _ => None,
        }
    }

    /// Apply the sign convention to a user-entered magnitude
    pub fn signed(&self, magnitude: i64) -> i64 {
        match self {
            TransactionKind::MoneyIn => magnitude,
            TransactionKind::MoneyOut => -magnitude,
        }
    }
}

// ============================================================================
// PERSON
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Natural key, unique and case-sensitive
    pub name: String,

    /// May go negative
    pub balance: i64,
}

impl Person {
    pub fn new(name: impl Into<String>, balance: i64) -> Self {
        Person {
            name: name.into(),
            balance,
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Immutable history record.
///
/// `kind` and `date` are kept as text: persisted data is accepted as-is on load,
/// whatever the label or date looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub person_name: String,

    /// Positive for money in, negative for money out
    pub amount: i64,

    /// `"Money In"` or `"Money Out"` for records created by this app
    #[serde(rename = "type")]
    pub kind: String,

    /// `YYYY-MM-DD`
    pub date: String,
}

impl Transaction {
    pub fn new(
        person_name: impl Into<String>,
        kind: TransactionKind,
        magnitude: i64,
        date: impl Into<String>,
    ) -> Self {
        Transaction {
            person_name: person_name.into(),
            amount: kind.signed(magnitude),
            kind: kind.as_str().to_string(),
            date: date.into(),
        }
    }

    /// Known kind, if the stored label is one of ours
    pub fn kind(&self) -> Option<TransactionKind> {
        TransactionKind::from_label(&self.kind)
    }

    /// `+500` / `-200` (no sign for zero)
    pub fn signed_display(&self) -> String {
        if self.amount > 0 {
            format!("+{}", self.amount)
        } else {
            self.amount.to_string()
        }
    }

    /// One row of a person's history, e.g. `Money In: +500 on 2026-10-17`
    pub fn history_line(&self) -> String {
        format!("{}: {} on {}", self.kind, self.signed_display(), self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(TransactionKind::MoneyIn.as_str(), "Money In");
        assert_eq!(TransactionKind::MoneyOut.as_str(), "Money Out");
        assert_eq!(TransactionKind::from_label("Money Out"), Some(TransactionKind::MoneyOut));
        assert_eq!(TransactionKind::from_label("money out"), None);
    }

    #[test]
    fn test_money_out_is_negated() {
        let tx = Transaction::new("Alice", TransactionKind::MoneyOut, 200, "2026-10-17");

        assert_eq!(tx.amount, -200);
        assert_eq!(tx.kind, "Money Out");
        assert_eq!(tx.kind(), Some(TransactionKind::MoneyOut));
    }

    #[test]
    fn test_history_line() {
        let credit = Transaction::new("Alice", TransactionKind::MoneyIn, 500, "2026-10-17");
        let debit = Transaction::new("Alice", TransactionKind::MoneyOut, 200, "2026-10-17");

        assert_eq!(credit.history_line(), "Money In: +500 on 2026-10-17");
        assert_eq!(debit.history_line(), "Money Out: -200 on 2026-10-17");
    }

    #[test]
    fn test_unknown_label_is_kept() {
        let tx = Transaction {
            person_name: "Bob".to_string(),
            amount: 7,
            kind: "Gift".to_string(),
            date: "someday".to_string(),
        };

        assert_eq!(tx.kind(), None);
        assert_eq!(tx.history_line(), "Gift: +7 on someday");
    }

    #[test]
    fn test_json_uses_type_field() {
        let tx = Transaction::new("Alice", TransactionKind::MoneyIn, 5, "2026-10-17");
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["type"], "Money In");
        assert_eq!(json["person_name"], "Alice");
    }
}
