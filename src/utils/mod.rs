use std::{env, path::PathBuf};

use splitbook_config::Config;

/// Overrides the directory holding configuration, groups, and backups.
pub const HOME_ENV: &str = "SPLITBOOK_HOME";

const DEFAULT_DIRECTIVE: &str = "splitbook=info,splitbook_core=info,splitbook_storage_json=info";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // a subscriber installed by an embedding binary or test harness wins
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolves the base directory, honouring [`HOME_ENV`].
pub fn base_dir() -> PathBuf {
    env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_base_dir)
}
