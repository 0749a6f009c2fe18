use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use splitbook_domain::{Group, SPLIT_TOLERANCE};

use crate::CoreError;

/// Describes a persisted backup of the group list.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends for the group list.
///
/// The whole list is loaded and saved at once; concurrent writers race and the
/// last save wins.
pub trait GroupRepository: Send + Sync {
    fn load(&self) -> Result<Vec<Group>, CoreError>;
    fn save(&self, groups: &[Group]) -> Result<(), CoreError>;
    fn backup(&self, groups: &[Group], note: Option<&str>) -> Result<GroupBackupInfo, CoreError>;
    fn list_backups(&self) -> Result<Vec<GroupBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &GroupBackupInfo) -> Result<Vec<Group>, CoreError>;
}

/// Volatile repository used by tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryGroupRepository {
    groups: Mutex<Vec<Group>>,
    backups: Mutex<Vec<(GroupBackupInfo, Vec<Group>)>>,
}

impl InMemoryGroupRepository {
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups: Mutex::new(groups),
            backups: Mutex::new(Vec::new()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, CoreError> {
    mutex
        .lock()
        .map_err(|_| CoreError::Storage("in-memory repository lock poisoned".into()))
}

impl GroupRepository for InMemoryGroupRepository {
    fn load(&self) -> Result<Vec<Group>, CoreError> {
        Ok(lock(&self.groups)?.clone())
    }

    fn save(&self, groups: &[Group]) -> Result<(), CoreError> {
        *lock(&self.groups)? = groups.to_vec();
        Ok(())
    }

    fn backup(&self, groups: &[Group], note: Option<&str>) -> Result<GroupBackupInfo, CoreError> {
        let mut backups = lock(&self.backups)?;
        let created_at = Utc::now().to_rfc3339();
        let mut id = format!("memory_{}", backups.len() + 1);
        if let Some(note) = note.map(str::trim).filter(|note| !note.is_empty()) {
            id.push('_');
            id.push_str(note);
        }
        let info = GroupBackupInfo {
            id: id.clone(),
            created_at,
            path: PathBuf::from(id),
        };
        backups.push((info.clone(), groups.to_vec()));
        Ok(info)
    }

    fn list_backups(&self) -> Result<Vec<GroupBackupInfo>, CoreError> {
        Ok(lock(&self.backups)?
            .iter()
            .rev()
            .map(|(info, _)| info.clone())
            .collect())
    }

    fn restore_backup(&self, backup: &GroupBackupInfo) -> Result<Vec<Group>, CoreError> {
        let snapshot = lock(&self.backups)?
            .iter()
            .find(|(info, _)| info.id == backup.id)
            .map(|(_, groups)| groups.clone())
            .ok_or_else(|| CoreError::Storage(format!("backup `{}` not found", backup.id)))?;
        self.save(&snapshot)?;
        Ok(snapshot)
    }
}

/// Detects dangling references and other anomalies within a loaded group list.
pub fn group_warnings(groups: &[Group]) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut group_ids = HashSet::new();

    for group in groups {
        if !group_ids.insert(group.id.as_str()) {
            warnings.push(format!("group id {} is used more than once", group.id));
        }
        let mut expense_ids = HashSet::new();
        for expense in &group.expenses {
            if !expense_ids.insert(expense.id.as_str()) {
                warnings.push(format!(
                    "group {} has duplicate expense id {}",
                    group.name, expense.id
                ));
            }
            if !group.has_member(&expense.paid_by) {
                warnings.push(format!(
                    "expense {} paid by unknown member `{}`",
                    expense.id, expense.paid_by
                ));
            }
            for split in &expense.splits {
                if !split.is_well_formed() {
                    warnings.push(format!(
                        "expense {} has a malformed split for `{}`",
                        expense.id, split.member
                    ));
                } else if !group.has_member(&split.member) {
                    warnings.push(format!(
                        "expense {} splits to unknown member `{}`",
                        expense.id, split.member
                    ));
                }
            }
            if (expense.amount - expense.split_total()).abs() > SPLIT_TOLERANCE {
                warnings.push(format!(
                    "expense {} splits add up to {:.2} instead of {:.2}",
                    expense.id,
                    expense.split_total(),
                    expense.amount
                ));
            }
        }
    }
    warnings
}
