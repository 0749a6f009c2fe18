//! Domain models for shared expenses and their per-member splits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::new_id;

/// One member's obligation within a single expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    #[serde(default, alias = "name")]
    pub member: String,
    #[serde(default, alias = "owes", deserialize_with = "lenient_amount")]
    pub owed_amount: f64,
}

impl Split {
    pub fn new(member: impl Into<String>, owed_amount: f64) -> Self {
        Self {
            member: member.into(),
            owed_amount,
        }
    }

    /// A split with no member or an unusable amount contributes nothing.
    pub fn is_well_formed(&self) -> bool {
        !self.member.trim().is_empty() && self.owed_amount.is_finite() && self.owed_amount >= 0.0
    }
}

/// A single payment event recorded against a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(default)]
    pub paid_by: String,
    #[serde(default)]
    pub splits: Vec<Split>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        splits: Vec<Split>,
    ) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            amount,
            paid_by: paid_by.into(),
            splits,
            created_at: Utc::now(),
        }
    }

    /// Sums the well-formed split amounts.
    pub fn split_total(&self) -> f64 {
        self.splits
            .iter()
            .filter(|split| split.is_well_formed())
            .map(|split| split.owed_amount)
            .sum()
    }

    /// Returns whether `member` paid for or owes anything in this expense.
    pub fn involves(&self, member: &str) -> bool {
        self.paid_by == member || self.splits.iter().any(|split| split.member == member)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Accepts numbers, numeric strings, and `null`; anything unreadable becomes zero.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(value)) => value,
        Some(RawAmount::Text(text)) => text.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}
