//! Group-level container for members and their shared expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    common::{new_id, Displayable},
    expense::Expense,
};

/// A named collection of members and the expenses they share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            members,
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|existing| existing == member)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// Sum of every recorded expense amount.
    pub fn total_spent(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Displayable for Group {
    fn display_label(&self) -> String {
        format!(
            "{} ({} member{}, {} expense{})",
            self.name,
            self.members.len(),
            if self.members.len() == 1 { "" } else { "s" },
            self.expenses.len(),
            if self.expenses.len() == 1 { "" } else { "s" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::Split;

    #[test]
    fn legacy_group_without_timestamps_loads() {
        let json = r#"[{"id":"1","name":"Trip","members":["A","B"],"expenses":[]}]"#;
        let groups: Vec<Group> = serde_json::from_str(json).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].has_member("A"));
        assert!(groups[0].expenses.is_empty());
    }

    #[test]
    fn display_label_pluralizes_counts() {
        let mut group = Group::new("Flat", vec!["Ann".into()]);
        assert_eq!(group.display_label(), "Flat (1 member, 0 expenses)");
        group.members.push("Ben".into());
        group
            .expenses
            .push(Expense::new("Rent", 10.0, "Ann", vec![Split::new("Ben", 10.0)]));
        assert_eq!(group.display_label(), "Flat (2 members, 1 expense)");
        assert_eq!(group.total_spent(), 10.0);
    }
}
