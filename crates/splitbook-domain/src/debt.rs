//! Directed debt keys and net settlement results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered `(debtor, creditor)` key used while accumulating balances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DebtPair {
    pub debtor: String,
    pub creditor: String,
}

impl DebtPair {
    pub fn new(debtor: impl Into<String>, creditor: impl Into<String>) -> Self {
        Self {
            debtor: debtor.into(),
            creditor: creditor.into(),
        }
    }

    /// The same two members with the direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            debtor: self.creditor.clone(),
            creditor: self.debtor.clone(),
        }
    }

    pub fn is_self_pair(&self) -> bool {
        self.debtor == self.creditor
    }
}

impl fmt::Display for DebtPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.debtor, self.creditor)
    }
}

/// A single directional amount one member owes another after netting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetDebt {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl NetDebt {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_with_delimiter_in_name_stays_distinct() {
        let tricky = DebtPair::new("a->b", "c");
        let plain = DebtPair::new("a", "b->c");
        assert_ne!(tricky, plain);
        assert_eq!(tricky.reversed(), DebtPair::new("c", "a->b"));
    }

    #[test]
    fn self_pair_is_detected() {
        assert!(DebtPair::new("Ann", "Ann").is_self_pair());
        assert!(!DebtPair::new("Ann", "Ben").is_self_pair());
    }
}
