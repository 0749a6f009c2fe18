//! Dispatch, error reporting, and group access helpers for the shell.

use std::{
    io,
    path::{Path, PathBuf},
};

use splitbook_config::{ConfigError, ConfigManager};
use splitbook_core::{
    storage::{group_warnings, GroupRepository},
    CoreError, GroupService,
};
use splitbook_domain::Group;
use splitbook_storage_json::{JsonGroupRepository, StoragePaths};
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::CommandRegistry;
pub use super::shell_context::{CliMode, ShellContext};

const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {}", usage))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Config(inner) => CliError::Config(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl ShellContext {
    /// Opens the shell against `<base>`: config under `config/`, groups and
    /// backups under the configured data root.
    pub fn new(mode: CliMode, base_dir: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir)?;
        let config = config_manager.load()?;
        let data_root = config.resolve_data_root(base_dir);
        let repository = JsonGroupRepository::with_retention(
            StoragePaths::under(&data_root),
            config.backup_retention,
        )?;
        Self::with_repository(mode, Box::new(repository), config_manager, data_root)
    }

    /// Builds a shell around an explicit repository.
    pub fn with_repository(
        mode: CliMode,
        repository: Box<dyn GroupRepository>,
        config_manager: ConfigManager,
        data_root: PathBuf,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        if mode == CliMode::Script {
            colored::control::set_override(false);
        } else {
            cli_io::apply_config(&config);
        }

        let context = ShellContext {
            mode,
            registry,
            repository,
            config_manager,
            config,
            data_root,
            last_command: None,
            running: true,
        };
        context.report_load_warnings()?;
        Ok(context)
    }

    fn report_load_warnings(&self) -> Result<(), CliError> {
        let groups = self.repository.load()?;
        for warning in group_warnings(&groups) {
            warn!(%warning, "stored group list is inconsistent");
            cli_io::print_warning(warning);
        }
        Ok(())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        match self.config.last_opened_group.as_deref() {
            Some(group) => format!("splitbook({})> ", group),
            None => "splitbook> ".to_string(),
        }
    }

    pub(crate) fn currency(&self) -> &str {
        &self.config.currency_symbol
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }
        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggestion_for(&self, input: &str) -> Option<&'static str> {
        let input = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &input), name))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, name)| (*distance, *name))
            .map(|(_, name)| name)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.suggestion_for(input) {
            cli_io::print_info(format!("Did you mean `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?")?)
    }

    /// Asks before a destructive action; script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(prompt),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::GroupNotFound(name)) => {
                cli_io::print_error(format!("Group not found: {}", name));
                cli_io::print_hint("Use `groups` to list existing groups.");
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::from(err)),
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn load_groups(&self) -> Result<Vec<Group>, CommandError> {
        Ok(self.repository.load()?)
    }

    /// Runs `f` against one group, looked up by id or name.
    pub(crate) fn with_group<T>(
        &self,
        key: &str,
        f: impl FnOnce(&Group) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let groups = self.load_groups()?;
        let group = GroupService::find(&groups, key)
            .ok_or_else(|| CoreError::GroupNotFound(key.to_string()))?;
        f(group)
    }

    /// Loads the full list, applies `f`, and saves the result.
    pub(crate) fn with_groups_mut<T>(
        &self,
        f: impl FnOnce(&mut Vec<Group>) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        let mut groups = self.load_groups()?;
        let value = f(&mut groups)?;
        self.repository.save(&groups)?;
        Ok(value)
    }

    /// Mutates one group in place and persists the list.
    pub(crate) fn with_group_mut<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut Group) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        self.with_groups_mut(|groups| {
            let group = GroupService::find_mut(groups, key)?;
            f(group)
        })
    }

    pub(crate) fn remember_group(&mut self, name: Option<&str>) -> CommandResult {
        self.config_manager.remember_group(&mut self.config, name)?;
        Ok(())
    }

    pub(crate) fn forget_group(&mut self, name: &str) -> CommandResult {
        self.config_manager.forget_group(&mut self.config, name)?;
        Ok(())
    }

    /// Uses the explicit group argument, falling back to the last used group.
    pub(crate) fn group_arg<'a>(
        &'a self,
        args: &'a [&'a str],
        usage: &str,
    ) -> Result<&'a str, CommandError> {
        args.first()
            .copied()
            .or(self.config.last_opened_group.as_deref())
            .ok_or_else(|| CommandError::usage(usage))
    }
}
