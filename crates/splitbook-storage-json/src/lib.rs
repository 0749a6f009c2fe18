//! splitbook-storage-json
//!
//! Filesystem-backed [`GroupRepository`] that keeps every group in one JSON
//! array, rewritten wholesale on each save. The previous file is copied into a
//! rotating backup directory before it is replaced.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use splitbook_core::{
    storage::{GroupBackupInfo, GroupRepository},
    CoreError,
};
use splitbook_domain::Group;
use tracing::{debug, info, warn};

const FILE_EXTENSION: &str = "json";
const GROUPS_FILE_STEM: &str = "groups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const BACKUP_TIMESTAMP_LEN: usize = 15;
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Locations used by [`JsonGroupRepository`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// Standard layout below a base directory: `<base>/data` and `<base>/backups`.
    pub fn under(base: &Path) -> Self {
        Self {
            data_root: base.join("data"),
            backup_root: base.join("backups"),
        }
    }
}

/// JSON persistence for the group list and its backups.
#[derive(Debug, Clone)]
pub struct JsonGroupRepository {
    paths: StoragePaths,
    retention: usize,
}

impl JsonGroupRepository {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.data_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn groups_path(&self) -> PathBuf {
        self.paths
            .data_root
            .join(format!("{}.{}", GROUPS_FILE_STEM, FILE_EXTENSION))
    }

    pub fn backup_path(&self, backup: &str) -> PathBuf {
        self.paths.backup_root.join(backup)
    }

    fn next_backup_path(&self, note: Option<&str>) -> PathBuf {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{}_{}", GROUPS_FILE_STEM, timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut path = self.backup_path(&format!("{}.{}", stem, FILE_EXTENSION));
        let mut attempt = 2;
        while path.exists() {
            path = self.backup_path(&format!("{}-{}.{}", stem, attempt, FILE_EXTENSION));
            attempt += 1;
        }
        path
    }

    fn backup_existing_file(&self, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.paths.backup_root)?;
        let backup_path = self.next_backup_path(None);
        fs::copy(path, &backup_path)?;
        debug!(backup = %backup_path.display(), "previous group list backed up");
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        let entries = self.list_backups()?;
        for entry in entries.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl GroupRepository for JsonGroupRepository {
    fn load(&self) -> Result<Vec<Group>, CoreError> {
        let path = self.groups_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_groups_from_path(&path)
    }

    fn save(&self, groups: &[Group]) -> Result<(), CoreError> {
        let path = self.groups_path();
        self.backup_existing_file(&path)?;
        save_groups_to_path(groups, &path)?;
        info!(groups = groups.len(), path = %path.display(), "group list saved");
        Ok(())
    }

    fn backup(&self, groups: &[Group], note: Option<&str>) -> Result<GroupBackupInfo, CoreError> {
        fs::create_dir_all(&self.paths.backup_root)?;
        let path = self.next_backup_path(note);
        write_atomic(&path, &serialize_groups(groups)?)?;
        self.prune_backups()?;
        let id = file_name(&path);
        Ok(GroupBackupInfo {
            created_at: backup_created_label(&id),
            id,
            path,
        })
    }

    fn list_backups(&self) -> Result<Vec<GroupBackupInfo>, CoreError> {
        let dir = &self.paths.backup_root;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let id = file_name(&path);
            if parse_backup_timestamp(&id).is_none() {
                continue;
            }
            entries.push(GroupBackupInfo {
                created_at: backup_created_label(&id),
                id,
                path,
            });
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(&b.id)
                .cmp(&parse_backup_timestamp(&a.id))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &GroupBackupInfo) -> Result<Vec<Group>, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let groups = load_groups_from_path(&backup.path)?;
        self.save(&groups)?;
        info!(backup = %backup.id, "group list restored from backup");
        Ok(groups)
    }
}

/// Saves a group list to an arbitrary path on disk.
pub fn save_groups_to_path(groups: &[Group], path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_groups(groups)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a group list from the provided filesystem path.
pub fn load_groups_from_path(path: &Path) -> Result<Vec<Group>, CoreError> {
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn serialize_groups(groups: &[Group]) -> Result<String, CoreError> {
    serde_json::to_string_pretty(groups).map_err(|err| CoreError::Serde(err.to_string()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}

fn backup_created_label(id: &str) -> String {
    parse_backup_timestamp(id)
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| id.to_string())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the timestamp out of `groups_YYYYmmdd_HHMMSS[_note][-n].json`.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(&format!("{}_", GROUPS_FILE_STEM))?;
    let raw = rest.get(..BACKUP_TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_notes_are_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("Before Trip 2.0")),
            Some("before-trip-2-0".to_string())
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
        assert_eq!(sanitize_backup_note(Some("!!!")), None);
    }

    #[test]
    fn backup_names_yield_timestamps() {
        let parsed = parse_backup_timestamp("groups_20240131_235959_before-trip-2.json")
            .expect("timestamp");
        assert_eq!(parsed.to_rfc3339(), "2024-01-31T23:59:59+00:00");
        assert!(parse_backup_timestamp("groups.json").is_none());
        assert!(parse_backup_timestamp("notes_20240131_235959.json").is_none());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/groups.json")),
            PathBuf::from("/data/groups.json.tmp")
        );
    }
}
