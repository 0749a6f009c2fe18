use splitbook_config::{Config, ConfigManager};
use std::fs;
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency_symbol.is_empty());
    assert!(!cfg.locale.is_empty());
    assert!(cfg.backup_retention > 0);
}

#[test]
fn missing_config_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.currency_symbol = "$".to_string();
    cfg.last_opened_group = Some("Trip".to_string());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency_symbol, "$");
    assert_eq!(loaded.last_opened_group.as_deref(), Some("Trip"));
}

#[test]
fn corrupt_config_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    fs::write(manager.config_path(), "{ not json").expect("write");

    let err = manager.load().unwrap_err();
    assert!(err.to_string().starts_with("Serialization error"));
}

#[test]
fn partial_config_file_loads_with_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    fs::write(manager.config_path(), r#"{"currency_symbol":"$"}"#).expect("write");

    let cfg = manager.load().expect("load partial config");
    assert_eq!(cfg.currency_symbol, "$");
    assert_eq!(cfg.locale, Config::default_locale());
    assert_eq!(cfg.backup_retention, Config::default_backup_retention());
}

#[test]
fn unusable_values_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    fs::write(
        manager.config_path(),
        r#"{"locale":" ","currency_symbol":"","backup_retention":0,"last_opened_group":"  "}"#,
    )
    .expect("write");

    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn remembered_group_is_persisted_once() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let mut cfg = Config::default();

    assert!(manager.remember_group(&mut cfg, Some(" Trip ")).expect("remember"));
    assert!(!manager.remember_group(&mut cfg, Some("Trip")).expect("unchanged"));
    assert_eq!(
        manager.load().expect("load").last_opened_group.as_deref(),
        Some("Trip")
    );

    assert!(!manager.forget_group(&mut cfg, "Flat").expect("other group"));
    assert!(manager.forget_group(&mut cfg, "trip").expect("forget"));
    assert!(manager.load().expect("load").last_opened_group.is_none());
}
