use splitbook_core::{format::format_amount, CoreError, GroupService, SettlementSummary};
use splitbook_domain::Displayable;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::expense::print_summary;

const GROUP_NEW_USAGE: &str = "group-new <name> <member>...";
const GROUP_USAGE: &str = "group <group>";
const GROUP_DELETE_USAGE: &str = "group-delete <group>";
const MEMBER_ADD_USAGE: &str = "member-add <group> <member>";
const MEMBER_REMOVE_USAGE: &str = "member-remove <group> <member>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "group-new",
            "Create a group with its initial members",
            GROUP_NEW_USAGE,
            cmd_group_new,
        ),
        CommandEntry::new("groups", "List groups", "groups", cmd_groups),
        CommandEntry::new(
            "group",
            "Show a group's expenses and balances",
            GROUP_USAGE,
            cmd_group,
        ),
        CommandEntry::new(
            "group-delete",
            "Delete a group and all of its expenses",
            GROUP_DELETE_USAGE,
            cmd_group_delete,
        ),
        CommandEntry::new(
            "member-add",
            "Add a member to a group",
            MEMBER_ADD_USAGE,
            cmd_member_add,
        ),
        CommandEntry::new(
            "member-remove",
            "Remove a member with no recorded expenses",
            MEMBER_REMOVE_USAGE,
            cmd_member_remove,
        ),
    ]
}

fn cmd_group_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, members @ ..] = args else {
        return Err(CommandError::usage(GROUP_NEW_USAGE));
    };
    if members.is_empty() {
        return Err(CommandError::usage(GROUP_NEW_USAGE));
    }

    let group = GroupService::create(name, members)?;
    let label = group.name.clone();
    let member_count = group.members.len();
    context.with_groups_mut(|groups| {
        if GroupService::find(groups, &group.name).is_some() {
            return Err(CoreError::InvalidOperation(format!(
                "a group named `{}` already exists",
                group.name
            ))
            .into());
        }
        groups.push(group);
        Ok(())
    })?;
    context.remember_group(Some(&label))?;
    cli_io::print_success(format!(
        "Group `{}` created with {} member(s).",
        label, member_count
    ));
    Ok(())
}

fn cmd_groups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let groups = context.load_groups()?;
    if groups.is_empty() {
        cli_io::print_info("No groups yet. Use `group-new <name> <member>...` to create one.");
        return Ok(());
    }
    output::section("Groups");
    for group in &groups {
        output::line(format!(
            "  {:<40} {}",
            group.display_label(),
            format_amount(context.currency(), group.total_spent())
        ));
    }
    Ok(())
}

fn cmd_group(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = context.group_arg(args, GROUP_USAGE)?.to_string();
    let name = context.with_group(&key, |group| {
        let symbol = context.currency();
        output::section(&group.name);
        output::line(format!("Members: {}", group.members.join(", ")));
        if group.expenses.is_empty() {
            cli_io::print_info("No expenses recorded.");
        } else {
            output::line("Expenses:");
            for expense in &group.expenses {
                output::line(format!(
                    "  {}  {:<24} {:>12}  paid by {}",
                    short_id(&expense.id),
                    expense.title,
                    format_amount(symbol, expense.amount),
                    expense.paid_by
                ));
            }
        }
        print_summary(symbol, &SettlementSummary::for_group(group));
        Ok(group.name.clone())
    })?;
    context.remember_group(Some(&name))
}

fn cmd_group_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key] = args else {
        return Err(CommandError::usage(GROUP_DELETE_USAGE));
    };
    let name = context.with_group(key, |group| Ok(group.name.clone()))?;
    if !context.confirm(&format!("Delete group `{}` and all its expenses?", name))? {
        cli_io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.with_groups_mut(|groups| {
        let idx = GroupService::position(groups, key)
            .ok_or_else(|| CoreError::GroupNotFound(key.to_string()))?;
        groups.remove(idx);
        Ok(())
    })?;
    context.forget_group(&name)?;
    cli_io::print_success(format!("Group `{}` deleted.", name));
    Ok(())
}

fn cmd_member_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, member] = args else {
        return Err(CommandError::usage(MEMBER_ADD_USAGE));
    };
    let group = context.with_group_mut(key, |group| {
        GroupService::add_member(group, member)?;
        Ok(group.name.clone())
    })?;
    cli_io::print_success(format!("{} joined `{}`.", member.trim(), group));
    Ok(())
}

fn cmd_member_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, member] = args else {
        return Err(CommandError::usage(MEMBER_REMOVE_USAGE));
    };
    let group = context.with_group_mut(key, |group| {
        GroupService::remove_member(group, member)?;
        Ok(group.name.clone())
    })?;
    cli_io::print_success(format!("{} left `{}`.", member.trim(), group));
    Ok(())
}

/// First eight characters of an id, enough to pick an expense out of a group.
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
