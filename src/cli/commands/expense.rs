use splitbook_core::{
    format::{format_amount, format_balance, format_debt, format_debts},
    CoreError, EntryService, ExpenseDraft, GroupService, SettlementSummary,
};
use splitbook_domain::{Group, Split};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

use super::group::short_id;

const EXPENSE_ADD_USAGE: &str = "expense-add <group> <title> <amount> <payer> [member=amount ...]";
const EXPENSE_DELETE_USAGE: &str = "expense-delete <group> <expense-id>";
const BALANCES_USAGE: &str = "balances <group>";
const SETTLE_USAGE: &str = "settle <group>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "expense-add",
            "Record an expense; without shares it is split evenly",
            EXPENSE_ADD_USAGE,
            cmd_expense_add,
        ),
        CommandEntry::new(
            "expense-delete",
            "Delete an expense by id or id prefix",
            EXPENSE_DELETE_USAGE,
            cmd_expense_delete,
        ),
        CommandEntry::new(
            "balances",
            "Show who owes whom in a group",
            BALANCES_USAGE,
            cmd_balances,
        ),
        CommandEntry::new(
            "settle",
            "Record the repayments that clear every debt",
            SETTLE_USAGE,
            cmd_settle,
        ),
    ]
}

fn cmd_expense_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, title, amount, payer, shares @ ..] = args else {
        return Err(CommandError::usage(EXPENSE_ADD_USAGE));
    };
    let amount = EntryService::parse_amount(amount)?;
    let splits = shares
        .iter()
        .map(|share| parse_share(share))
        .collect::<Result<Vec<_>, _>>()?;

    let (group_name, id) = context.with_group_mut(key, |group| {
        let draft = if splits.is_empty() {
            ExpenseDraft::even_split(*title, amount, *payer, &group.members)
        } else {
            ExpenseDraft::new(*title, amount, *payer, splits)
        };
        let id = GroupService::add_expense(group, draft)?;
        Ok((group.name.clone(), id))
    })?;
    context.remember_group(Some(&group_name))?;
    cli_io::print_success(format!(
        "Expense `{}` recorded in `{}` ({}).",
        title.trim(),
        group_name,
        short_id(&id)
    ));
    Ok(())
}

fn cmd_expense_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, expense] = args else {
        return Err(CommandError::usage(EXPENSE_DELETE_USAGE));
    };
    let removed = context.with_group_mut(key, |group| {
        let id = resolve_expense_id(group, expense)?;
        Ok(GroupService::delete_expense(group, &id)?)
    })?;
    cli_io::print_success(format!(
        "Expense `{}` ({}) deleted.",
        removed.title,
        format_amount(context.currency(), removed.amount)
    ));
    Ok(())
}

fn cmd_balances(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = context.group_arg(args, BALANCES_USAGE)?.to_string();
    let summary = context.with_group(&key, |group| Ok(SettlementSummary::for_group(group)))?;
    output::section(&summary.group_name);
    print_summary(context.currency(), &summary);
    context.remember_group(Some(&summary.group_name))
}

fn cmd_settle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = context.group_arg(args, SETTLE_USAGE)?.to_string();
    let (group_name, cleared) = context.with_group_mut(&key, |group| {
        let cleared = GroupService::settle_up(group)?;
        Ok((group.name.clone(), cleared))
    })?;
    if cleared.is_empty() {
        cli_io::print_info(format!("`{}` is already settled up.", group_name));
        return Ok(());
    }
    for debt in &cleared {
        output::line(format!("Recorded: {}", format_debt(context.currency(), debt)));
    }
    cli_io::print_success(format!(
        "{} repayment(s) recorded; `{}` is settled up.",
        cleared.len(),
        group_name
    ));
    Ok(())
}

/// Prints debts followed by every member's raw position.
pub(crate) fn print_summary(symbol: &str, summary: &SettlementSummary) {
    output::line(format!(
        "Total spent: {} across {} expense(s)",
        format_amount(symbol, summary.total_spent),
        summary.expense_count
    ));
    if summary.is_settled() {
        output::line("Everyone is settled up.");
    } else {
        output::line("Debts:");
        for line in format_debts(symbol, &summary.debts) {
            output::line(format!("  {}", line));
        }
    }
    output::line("Balances:");
    for (member, balance) in &summary.balances {
        output::line(format!("  {}", format_balance(symbol, member, *balance)));
    }
}

/// Parses `member=amount`.
fn parse_share(raw: &str) -> Result<Split, CommandError> {
    let (member, amount) = raw.split_once('=').ok_or_else(|| {
        CommandError::InvalidArguments(format!("share `{}` must look like member=amount", raw))
    })?;
    if member.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "share `{}` is missing a member name",
            raw
        )));
    }
    Ok(Split::new(member.trim(), EntryService::parse_amount(amount)?))
}

/// Accepts a full expense id or a prefix that matches exactly one expense.
fn resolve_expense_id(group: &Group, token: &str) -> Result<String, CommandError> {
    let token = token.trim();
    if group.expense(token).is_some() {
        return Ok(token.to_string());
    }
    let matches: Vec<&str> = group
        .expenses
        .iter()
        .map(|expense| expense.id.as_str())
        .filter(|id| !token.is_empty() && id.starts_with(token))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(CoreError::ExpenseNotFound(token.to_string()).into()),
        _ => Err(CommandError::InvalidArguments(format!(
            "expense id `{}` is ambiguous; use more characters",
            token
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_parse_member_and_amount() {
        let split = parse_share(" Bob = 12.5").unwrap();
        assert_eq!(split.member, "Bob");
        assert_eq!(split.owed_amount, 12.5);
        assert!(parse_share("Bob").is_err());
        assert!(parse_share("=3").is_err());
        assert!(parse_share("Bob=abc").is_err());
    }

    #[test]
    fn expense_ids_resolve_by_unique_prefix() {
        let mut group = GroupService::create("Trip", ["Alice", "Bob"]).unwrap();
        let draft = ExpenseDraft::even_split("Taxi", 20.0, "Alice", &group.members);
        let id = GroupService::add_expense(&mut group, draft).unwrap();

        assert_eq!(resolve_expense_id(&group, &id).unwrap(), id);
        assert_eq!(resolve_expense_id(&group, &id[..6]).unwrap(), id);
        assert!(resolve_expense_id(&group, "zzzz").is_err());
        assert!(resolve_expense_id(&group, "").is_err());
    }
}
