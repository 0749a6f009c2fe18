//! Debt-settlement engine.
//!
//! Turns a group's expense list into the set of pairwise debts that settles
//! every balance. The computation is pure: it reads the expenses it is given,
//! allocates local accumulators, and returns a fresh list of [`NetDebt`]s.
//!
//! Only opposing balances between the same two members are netted. Cycles
//! across three or more members (A owes B, B owes C, C owes A) are left as
//! separate debts.

use std::collections::HashMap;

use splitbook_domain::{amounts_match, round_currency, DebtPair, Expense, NetDebt};
use tracing::{debug, error};

/// Cumulative amount each debtor owes each creditor before netting.
pub type DirectedBalances = HashMap<DebtPair, f64>;

/// Computes the netted debts for `expenses`.
///
/// The result is sorted by `(from, to)`, contains no self pairs, at most one
/// entry per unordered member pair, and only amounts above zero rounded to
/// two decimals. Malformed splits contribute nothing; the function never fails.
pub fn compute_settlement(expenses: &[Expense]) -> Vec<NetDebt> {
    let balances = accumulate_directed_balances(expenses);
    let gross_pairs = balances.len();
    let debts = net_directed_balances(balances);
    debug!(
        expenses = expenses.len(),
        gross_pairs,
        net_debts = debts.len(),
        "settlement computed"
    );
    debts
}

/// Sums every split into a `(member, payer)` keyed balance.
///
/// Splits owed by the payer are skipped, as are splits without a member or
/// with a non-finite or negative amount. Expenses without a payer are ignored.
pub fn accumulate_directed_balances(expenses: &[Expense]) -> DirectedBalances {
    let mut balances = DirectedBalances::new();
    for expense in expenses {
        if expense.paid_by.trim().is_empty() {
            debug!(expense = %expense.id, "skipping expense without payer");
            continue;
        }
        for split in &expense.splits {
            if !split.is_well_formed() {
                debug!(expense = %expense.id, member = %split.member, "skipping malformed split");
                continue;
            }
            if split.member == expense.paid_by {
                continue;
            }
            let pair = DebtPair::new(split.member.clone(), expense.paid_by.clone());
            *balances.entry(pair).or_insert(0.0) += split.owed_amount;
        }
    }
    balances
}

/// Collapses opposing balances and emits the surviving debts.
///
/// Each unordered pair is resolved exactly once: both directions are taken out
/// of the map together, so the reverse entry is never revisited as a fresh pair.
/// Amounts in `balances` are expected to be non-negative.
pub fn net_directed_balances(mut balances: DirectedBalances) -> Vec<NetDebt> {
    let mut pairs: Vec<DebtPair> = balances.keys().cloned().collect();
    pairs.sort();

    let mut debts = Vec::new();
    for pair in pairs {
        let Some(forward) = balances.remove(&pair) else {
            continue;
        };
        if pair.is_self_pair() {
            continue;
        }
        let reverse = pair.reversed();
        let backward = balances.remove(&reverse).unwrap_or(0.0);

        if forward < 0.0 || backward < 0.0 {
            error!(%pair, forward, backward, "negative directed balance reached netting");
            debug_assert!(false, "negative directed balance for {pair}");
            continue;
        }

        if amounts_match(forward, backward) {
            debug!(%pair, "mutual debts cancel");
            continue;
        }
        let difference = forward - backward;
        let (debtor_pair, residual) = if difference > 0.0 {
            (pair, difference)
        } else {
            (reverse, -difference)
        };

        let amount = round_currency(residual);
        if amount > 0.0 {
            debts.push(NetDebt::new(
                debtor_pair.debtor,
                debtor_pair.creditor,
                amount,
            ));
        }
    }

    debts.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));
    debts
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitbook_domain::Split;

    fn expense(paid_by: &str, amount: f64, splits: &[(&str, f64)]) -> Expense {
        Expense::new(
            "test",
            amount,
            paid_by,
            splits
                .iter()
                .map(|(member, owed)| Split::new(*member, *owed))
                .collect(),
        )
    }

    #[test]
    fn empty_expense_list_settles_to_nothing() {
        assert!(compute_settlement(&[]).is_empty());
    }

    #[test]
    fn even_split_leaves_non_payer_in_debt() {
        let debts = compute_settlement(&[expense("Alice", 100.0, &[("Alice", 50.0), ("Bob", 50.0)])]);
        assert_eq!(debts, vec![NetDebt::new("Bob", "Alice", 50.0)]);
    }

    #[test]
    fn opposing_debts_are_netted() {
        let debts = compute_settlement(&[
            expense("Alice", 60.0, &[("Bob", 60.0)]),
            expense("Bob", 40.0, &[("Alice", 40.0)]),
        ]);
        assert_eq!(debts, vec![NetDebt::new("Bob", "Alice", 20.0)]);
    }

    #[test]
    fn larger_reverse_balance_wins() {
        let debts = compute_settlement(&[
            expense("Alice", 25.0, &[("Bob", 25.0)]),
            expense("Bob", 70.0, &[("Alice", 70.0)]),
        ]);
        assert_eq!(debts, vec![NetDebt::new("Alice", "Bob", 45.0)]);
    }

    #[test]
    fn equal_mutual_debts_cancel() {
        let debts = compute_settlement(&[
            expense("A", 30.0, &[("B", 30.0)]),
            expense("B", 30.0, &[("A", 30.0)]),
        ]);
        assert!(debts.is_empty());
    }

    #[test]
    fn self_debt_is_skipped() {
        assert!(compute_settlement(&[expense("A", 20.0, &[("A", 20.0)])]).is_empty());
    }

    #[test]
    fn float_noise_does_not_leave_residual_debt() {
        let debts = compute_settlement(&[
            expense("A", 0.3, &[("B", 0.1), ("B", 0.2)]),
            expense("B", 0.3, &[("A", 0.3)]),
        ]);
        assert!(debts.is_empty());
    }

    #[test]
    fn repeated_expenses_accumulate_on_same_pair() {
        let debts = compute_settlement(&[
            expense("Alice", 10.0, &[("Bob", 10.0)]),
            expense("Alice", 15.5, &[("Bob", 15.5)]),
        ]);
        assert_eq!(debts, vec![NetDebt::new("Bob", "Alice", 25.5)]);
    }

    #[test]
    fn mismatched_split_totals_are_trusted_as_given() {
        let debts = compute_settlement(&[expense("Alice", 100.0, &[("Bob", 10.0)])]);
        assert_eq!(debts, vec![NetDebt::new("Bob", "Alice", 10.0)]);
    }

    #[test]
    fn malformed_splits_contribute_nothing() {
        let debts = compute_settlement(&[expense(
            "Alice",
            30.0,
            &[("", 10.0), ("Bob", f64::NAN), ("Carol", -5.0), ("Dan", 30.0)],
        )]);
        assert_eq!(debts, vec![NetDebt::new("Dan", "Alice", 30.0)]);
    }

    #[test]
    fn expense_without_payer_is_ignored() {
        assert!(compute_settlement(&[expense("", 10.0, &[("Bob", 10.0)])]).is_empty());
    }

    #[test]
    fn member_names_containing_arrows_stay_distinct() {
        let debts = compute_settlement(&[
            expense("b", 5.0, &[("a->b", 5.0)]),
            expense("a", 7.0, &[("b->a", 7.0)]),
        ]);
        assert_eq!(
            debts,
            vec![NetDebt::new("a->b", "b", 5.0), NetDebt::new("b->a", "a", 7.0)]
        );
    }

    #[test]
    fn three_member_cycle_is_not_minimized() {
        let debts = compute_settlement(&[
            expense("B", 10.0, &[("A", 10.0)]),
            expense("C", 10.0, &[("B", 10.0)]),
            expense("A", 10.0, &[("C", 10.0)]),
        ]);
        assert_eq!(debts.len(), 3);
    }

    #[test]
    fn output_amounts_are_rounded_to_cents() {
        let debts = compute_settlement(&[expense(
            "Alice",
            10.0,
            &[("Bob", 10.0 / 3.0), ("Carol", 10.0 / 3.0), ("Alice", 10.0 / 3.0)],
        )]);
        assert_eq!(
            debts,
            vec![
                NetDebt::new("Bob", "Alice", 3.33),
                NetDebt::new("Carol", "Alice", 3.33)
            ]
        );
    }

    #[test]
    fn half_cent_residual_after_rounded_repayment_cancels() {
        let debts = compute_settlement(&[
            expense("Ann", 0.25, &[("Ann", 0.125), ("Ben", 0.125)]),
            expense("Ben", 0.13, &[("Ann", 0.13)]),
        ]);
        assert!(debts.is_empty(), "{debts:?}");
    }

    #[test]
    fn residual_above_half_cent_is_still_emitted() {
        let debts = compute_settlement(&[
            expense("Ann", 0.25, &[("Ben", 0.125)]),
            expense("Ben", 0.118, &[("Ann", 0.118)]),
        ]);
        assert_eq!(debts, vec![NetDebt::new("Ben", "Ann", 0.01)]);
    }

    #[test]
    fn netting_skips_self_pairs_in_raw_balances() {
        let mut balances = DirectedBalances::new();
        balances.insert(DebtPair::new("A", "A"), 12.0);
        balances.insert(DebtPair::new("B", "A"), 4.0);
        assert_eq!(
            net_directed_balances(balances),
            vec![NetDebt::new("B", "A", 4.0)]
        );
    }
}
