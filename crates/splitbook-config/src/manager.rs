use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Loads and persists [`Config`] as a single JSON file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Uses `<base>/config/config.json`, creating the directory if needed.
    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        let dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join(CONFIG_FILE)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the config file; a missing file yields defaults and missing or
    /// unusable fields fall back to their defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(&self.config_path)?;
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config =
            serde_json::from_str(&raw).map_err(|err| ConfigError::Serde(err.to_string()))?;
        Ok(normalized(config))
    }

    /// Writes `config` through a sibling temp file and a rename.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = self.config_path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    /// Records the group the shell falls back to. Returns whether anything
    /// was written.
    pub fn remember_group(
        &self,
        config: &mut Config,
        group: Option<&str>,
    ) -> Result<bool, ConfigError> {
        let group = group
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        if config.last_opened_group == group {
            return Ok(false);
        }
        config.last_opened_group = group;
        self.save(config)?;
        Ok(true)
    }

    /// Clears the remembered group when it names `group` (case-insensitive).
    pub fn forget_group(&self, config: &mut Config, group: &str) -> Result<bool, ConfigError> {
        let remembered = config
            .last_opened_group
            .as_deref()
            .is_some_and(|last| last.eq_ignore_ascii_case(group.trim()));
        if !remembered {
            return Ok(false);
        }
        self.remember_group(config, None)
    }
}

fn normalized(mut config: Config) -> Config {
    if config.locale.trim().is_empty() {
        config.locale = Config::default_locale();
    }
    if config.currency_symbol.trim().is_empty() {
        config.currency_symbol = Config::default_currency_symbol();
    }
    if config.backup_retention == 0 {
        config.backup_retention = Config::default_backup_retention();
    }
    if config
        .last_opened_group
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        config.last_opened_group = None;
    }
    config
}
