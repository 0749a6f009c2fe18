use std::path::PathBuf;

use splitbook_config::{Config, ConfigManager};
use splitbook_core::storage::GroupRepository;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command handler for the lifetime of the shell.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub repository: Box<dyn GroupRepository>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub data_root: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}
