use splitbook_domain::{amounts_match, round_currency, NetDebt};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Renders `value` with two decimals behind the currency symbol.
pub fn format_amount(symbol: &str, value: f64) -> String {
    let rounded = round_currency(value);
    // avoid printing "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}{:.2}", symbol, rounded)
}

/// `"{from} owes {to} {symbol}{amount}"`.
pub fn format_debt(symbol: &str, debt: &NetDebt) -> String {
    format!(
        "{} owes {} {}",
        debt.from,
        debt.to,
        format_amount(symbol, debt.amount)
    )
}

/// One line per debt; empty input renders nothing.
pub fn format_debts(symbol: &str, debts: &[NetDebt]) -> Vec<String> {
    debts.iter().map(|debt| format_debt(symbol, debt)).collect()
}

/// Describes a member's raw balance in plain words.
pub fn format_balance(symbol: &str, member: &str, balance: f64) -> String {
    if amounts_match(balance, 0.0) {
        format!("{} is settled up", member)
    } else if balance > 0.0 {
        format!("{} owes {} in total", member, format_amount(symbol, balance))
    } else {
        format!("{} is owed {} in total", member, format_amount(symbol, -balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_line_matches_display_format() {
        let debt = NetDebt::new("Bob", "Alice", 50.0);
        assert_eq!(
            format_debt(DEFAULT_CURRENCY_SYMBOL, &debt),
            "Bob owes Alice ₹50.00"
        );
    }

    #[test]
    fn empty_debt_list_renders_nothing() {
        assert!(format_debts("$", &[]).is_empty());
    }

    #[test]
    fn balances_describe_direction() {
        assert_eq!(format_balance("$", "Ann", 12.5), "Ann owes $12.50 in total");
        assert_eq!(format_balance("$", "Ben", -3.0), "Ben is owed $3.00 in total");
        assert_eq!(format_balance("$", "Cat", -0.001), "Cat is settled up");
        assert_eq!(format_amount("$", -0.001), "$0.00");
    }
}
