//! Per-member balance reporting built on top of the settlement engine.

use std::collections::BTreeMap;

use splitbook_domain::{Expense, Group, NetDebt};

use crate::{entry_service::ExpenseDraft, settlement::compute_settlement};

/// Raw net position of every member before pairwise netting.
///
/// A positive value means the member owes more than they are owed.
pub fn member_balances(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut balances = BTreeMap::new();
    for expense in expenses {
        if expense.paid_by.trim().is_empty() {
            continue;
        }
        for split in &expense.splits {
            if !split.is_well_formed() || split.member == expense.paid_by {
                continue;
            }
            *balances.entry(split.member.clone()).or_insert(0.0) += split.owed_amount;
            *balances.entry(expense.paid_by.clone()).or_insert(0.0) -= split.owed_amount;
        }
    }
    balances
}

/// Net position each member has across a list of settled debts.
pub fn debt_positions(debts: &[NetDebt]) -> BTreeMap<String, f64> {
    let mut positions = BTreeMap::new();
    for debt in debts {
        *positions.entry(debt.from.clone()).or_insert(0.0) += debt.amount;
        *positions.entry(debt.to.clone()).or_insert(0.0) -= debt.amount;
    }
    positions
}

/// Repayment drafts that, once recorded, clear every debt in `debts`.
pub fn settlement_payments(debts: &[NetDebt]) -> Vec<ExpenseDraft> {
    debts.iter().map(ExpenseDraft::settlement).collect()
}

/// Snapshot of a group's settlement state.
#[derive(Debug, Clone)]
pub struct SettlementSummary {
    pub group_name: String,
    pub debts: Vec<NetDebt>,
    pub balances: BTreeMap<String, f64>,
    pub total_spent: f64,
    pub expense_count: usize,
}

impl SettlementSummary {
    pub fn for_group(group: &Group) -> Self {
        let mut balances = member_balances(&group.expenses);
        for member in &group.members {
            balances.entry(member.clone()).or_insert(0.0);
        }
        Self {
            group_name: group.name.clone(),
            debts: compute_settlement(&group.expenses),
            balances,
            total_spent: group.total_spent(),
            expense_count: group.expenses.len(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.debts.is_empty()
    }
}
