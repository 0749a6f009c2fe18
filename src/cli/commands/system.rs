use splitbook_core::storage::GroupBackupInfo;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const RESTORE_USAGE: &str = "restore <backup-name|index>";
const CONFIG_USAGE: &str = "config [currency|color|retention <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "backup",
            "Snapshot the group list with an optional note",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new("backups", "List saved backups", "backups", cmd_backups),
        CommandEntry::new(
            "restore",
            "Replace the group list with a backup",
            RESTORE_USAGE,
            cmd_restore,
        ),
        CommandEntry::new("config", "Show or change settings", CONFIG_USAGE, cmd_config),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let groups = context.load_groups()?;
    let info = context.repository.backup(&groups, note.as_deref())?;
    cli_io::print_success(format!("Backup `{}` created.", info.id));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.repository.list_backups()?;
    if backups.is_empty() {
        cli_io::print_info("No backups yet.");
        return Ok(());
    }
    output::section("Backups");
    for (idx, backup) in backups.iter().enumerate() {
        output::line(format!("  {:>2}. {}  {}", idx + 1, backup.id, backup.created_at));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::usage(RESTORE_USAGE));
    };
    let backups = context.repository.list_backups()?;
    let backup = select_backup(&backups, reference)?;
    if !context.confirm(&format!(
        "Replace the current group list with `{}`?",
        backup.id
    ))? {
        cli_io::print_info("Restore cancelled.");
        return Ok(());
    }
    let groups = context.repository.restore_backup(backup)?;
    cli_io::print_success(format!(
        "Restored {} group(s) from `{}`.",
        groups.len(),
        backup.id
    ));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let config = &context.config;
            output::section("Configuration");
            output::line(format!("  Locale: {}", config.locale));
            output::line(format!("  Currency: {}", config.currency_symbol));
            output::line(format!(
                "  Color: {}",
                if config.ui_color_enabled { "on" } else { "off" }
            ));
            output::line(format!("  Backup retention: {}", config.backup_retention));
            output::line(format!("  Data root: {}", context.data_root.display()));
            output::line(format!(
                "  Config file: {}",
                context.config_manager.config_path().display()
            ));
            Ok(())
        }
        [key, value] => {
            match key.to_ascii_lowercase().as_str() {
                "currency" => context.config.currency_symbol = value.trim().to_string(),
                "color" => context.config.ui_color_enabled = parse_switch(value)?,
                "retention" => {
                    let retention: usize = value.parse().map_err(|_| {
                        CommandError::InvalidArguments("retention must be a whole number".into())
                    })?;
                    if retention == 0 {
                        return Err(CommandError::InvalidArguments(
                            "retention must be at least 1".into(),
                        ));
                    }
                    context.config.backup_retention = retention;
                }
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown config key `{}`",
                        other
                    )))
                }
            }
            context.config_manager.save(&context.config)?;
            cli_io::apply_config(&context.config);
            cli_io::print_success("Configuration updated.");
            Ok(())
        }
        _ => Err(CommandError::usage(CONFIG_USAGE)),
    }
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context.registry.get(&name.to_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("no help for unknown command `{}`", name))
        })?;
        output::line(format!("{}: {}", entry.name, entry.description));
        output::line(format!("usage: {}", entry.usage));
        return Ok(());
    }
    output::section("Commands");
    for entry in context.registry.list() {
        output::line(format!("  {:<58} {}", entry.usage, entry.description));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

/// Finds a backup by file name, name without extension, or 1-based list index.
fn select_backup<'a>(
    backups: &'a [GroupBackupInfo],
    reference: &str,
) -> Result<&'a GroupBackupInfo, CommandError> {
    let reference = reference.trim();
    if let Ok(index) = reference.parse::<usize>() {
        if let Some(backup) = index.checked_sub(1).and_then(|idx| backups.get(idx)) {
            return Ok(backup);
        }
    }
    backups
        .iter()
        .find(|backup| {
            backup.id == reference || backup.id.strip_suffix(".json") == Some(reference)
        })
        .ok_or_else(|| CommandError::Message(format!("backup `{}` not found", reference)))
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on/off, got `{}`",
            other
        ))),
    }
}
