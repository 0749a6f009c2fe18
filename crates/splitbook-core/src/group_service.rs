//! Helper functions for group and expense bookkeeping.

use splitbook_domain::{normalize_member, Expense, Group, NetDebt};
use tracing::info;

use crate::{
    entry_service::{EntryService, ExpenseDraft},
    settlement::compute_settlement,
    CoreError,
};

/// Provides constructor and mutation helpers for [`Group`] instances.
pub struct GroupService;

impl GroupService {
    /// Creates a group from a name and a list of member names.
    ///
    /// Member names are trimmed; blanks and repeats are dropped while keeping
    /// first-seen order.
    pub fn create<I, S>(name: &str, members: I) -> Result<Group, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("group name is required".into()));
        }
        let mut unique: Vec<String> = Vec::new();
        for member in members {
            let member = normalize_member(member.as_ref());
            if !member.is_empty() && !unique.contains(&member) {
                unique.push(member);
            }
        }
        if unique.is_empty() {
            return Err(CoreError::Validation(
                "a group needs at least one member".into(),
            ));
        }
        Ok(Group::new(name, unique))
    }

    pub fn add_member(group: &mut Group, member: &str) -> Result<(), CoreError> {
        let member = normalize_member(member);
        if member.is_empty() {
            return Err(CoreError::Validation("member name is required".into()));
        }
        if group.has_member(&member) {
            return Err(CoreError::InvalidOperation(format!(
                "{} is already in {}",
                member, group.name
            )));
        }
        group.members.push(member);
        group.touch();
        Ok(())
    }

    /// Removes a member who is not referenced by any expense.
    pub fn remove_member(group: &mut Group, member: &str) -> Result<(), CoreError> {
        let member = normalize_member(member);
        let position = group
            .members
            .iter()
            .position(|existing| *existing == member)
            .ok_or_else(|| CoreError::MemberNotFound(member.clone()))?;
        if group.expenses.iter().any(|expense| expense.involves(&member)) {
            return Err(CoreError::InvalidOperation(format!(
                "{} still appears in recorded expenses",
                member
            )));
        }
        if group.members.len() == 1 {
            return Err(CoreError::InvalidOperation(
                "a group needs at least one member".into(),
            ));
        }
        group.members.remove(position);
        group.touch();
        Ok(())
    }

    /// Validates and appends an expense, returning its id.
    pub fn add_expense(group: &mut Group, draft: ExpenseDraft) -> Result<String, CoreError> {
        let expense = EntryService::validate(group, draft)?;
        let id = expense.id.clone();
        info!(group = %group.name, expense = %id, amount = expense.amount, "expense recorded");
        group.expenses.push(expense);
        group.touch();
        Ok(id)
    }

    pub fn delete_expense(group: &mut Group, expense_id: &str) -> Result<Expense, CoreError> {
        let position = group
            .expenses
            .iter()
            .position(|expense| expense.id == expense_id)
            .ok_or_else(|| CoreError::ExpenseNotFound(expense_id.to_string()))?;
        let removed = group.expenses.remove(position);
        info!(group = %group.name, expense = %removed.id, "expense deleted");
        group.touch();
        Ok(removed)
    }

    /// Records a repayment for every outstanding debt and returns what was cleared.
    pub fn settle_up(group: &mut Group) -> Result<Vec<NetDebt>, CoreError> {
        let debts = compute_settlement(&group.expenses);
        for debt in &debts {
            Self::add_expense(group, ExpenseDraft::settlement(debt))?;
        }
        Ok(debts)
    }

    /// Looks a group up by exact id, then by case-insensitive name.
    pub fn find<'a>(groups: &'a [Group], key: &str) -> Option<&'a Group> {
        Self::position(groups, key).map(|idx| &groups[idx])
    }

    pub fn position(groups: &[Group], key: &str) -> Option<usize> {
        let key = key.trim();
        groups
            .iter()
            .position(|group| group.id == key)
            .or_else(|| {
                groups
                    .iter()
                    .position(|group| group.name.eq_ignore_ascii_case(key))
            })
    }

    pub fn find_mut<'a>(groups: &'a mut [Group], key: &str) -> Result<&'a mut Group, CoreError> {
        let idx = Self::position(groups, key)
            .ok_or_else(|| CoreError::GroupNotFound(key.to_string()))?;
        Ok(&mut groups[idx])
    }
}
