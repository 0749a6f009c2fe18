//! Validation gate for new expenses.
//!
//! Everything that reaches the settlement engine passes through
//! [`EntryService::validate`] first, so the engine itself can stay lenient.

use std::collections::HashSet;

use splitbook_domain::{
    normalize_member, round_currency, Expense, Group, NetDebt, Split, MINOR_UNITS,
    SPLIT_TOLERANCE,
};

use crate::CoreError;

/// Unvalidated expense input collected from a frontend.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: f64,
    pub paid_by: String,
    pub splits: Vec<Split>,
}

impl ExpenseDraft {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        splits: Vec<Split>,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            paid_by: paid_by.into(),
            splits,
        }
    }

    /// Divides `amount` across `members` in whole minor units.
    ///
    /// Leftover cents go to the first members in order, so the split total
    /// always equals the rounded amount.
    pub fn even_split(
        title: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        members: &[String],
    ) -> Self {
        let mut splits = Vec::with_capacity(members.len());
        if !members.is_empty() && amount.is_finite() {
            let cents = (amount * MINOR_UNITS).round() as i64;
            let count = members.len() as i64;
            let base = cents.div_euclid(count);
            let remainder = cents.rem_euclid(count) as usize;
            for (idx, member) in members.iter().enumerate() {
                let share = base + i64::from(idx < remainder);
                splits.push(Split::new(member.clone(), share as f64 / MINOR_UNITS));
            }
        }
        Self::new(title, amount, paid_by, splits)
    }

    /// Repayment that clears `debt`: the debtor pays and the creditor's share
    /// offsets what was owed.
    pub fn settlement(debt: &NetDebt) -> Self {
        Self::new(
            format!("Settlement: {} paid {}", debt.from, debt.to),
            debt.amount,
            debt.from.clone(),
            vec![Split::new(debt.to.clone(), debt.amount)],
        )
    }

    pub fn split_total(&self) -> f64 {
        self.splits.iter().map(|split| split.owed_amount).sum()
    }
}

/// Validates drafts against their group and mints immutable [`Expense`]s.
pub struct EntryService;

impl EntryService {
    /// Checks `draft` and returns the expense ready to be stored.
    pub fn validate(group: &Group, draft: ExpenseDraft) -> Result<Expense, CoreError> {
        let title = draft.title.trim();
        let paid_by = normalize_member(&draft.paid_by);
        if title.is_empty() || paid_by.is_empty() {
            return Err(CoreError::Validation(
                "please fill all fields: title, amount and payer are required".into(),
            ));
        }
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(CoreError::Validation(format!(
                "amount must be a positive number, got {}",
                draft.amount
            )));
        }
        if !group.has_member(&paid_by) {
            return Err(CoreError::MemberNotFound(paid_by));
        }

        let mut seen = HashSet::new();
        let mut splits = Vec::with_capacity(draft.splits.len());
        for split in draft.splits {
            let member = normalize_member(&split.member);
            if !group.has_member(&member) {
                return Err(CoreError::MemberNotFound(member));
            }
            if !split.owed_amount.is_finite() || split.owed_amount < 0.0 {
                return Err(CoreError::Validation(format!(
                    "share for {} must be zero or more",
                    member
                )));
            }
            if !seen.insert(member.clone()) {
                return Err(CoreError::Validation(format!(
                    "{} appears more than once in the split",
                    member
                )));
            }
            splits.push(Split::new(member, split.owed_amount));
        }

        let split_total: f64 = splits.iter().map(|split| split.owed_amount).sum();
        if (draft.amount - split_total).abs() > SPLIT_TOLERANCE {
            return Err(CoreError::Validation(format!(
                "split does not match total amount: expected {:.2}, shares add up to {:.2}",
                draft.amount,
                round_currency(split_total)
            )));
        }

        Ok(Expense::new(title, draft.amount, paid_by, splits))
    }

    /// Parses a user-entered amount such as `"12.50"`.
    pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("`{}` is not a valid amount", raw)))?;
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "`{}` is not a valid amount",
                raw
            )));
        }
        Ok(value)
    }
}
