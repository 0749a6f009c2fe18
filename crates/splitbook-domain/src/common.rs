//! Shared traits, identifiers, and currency helpers for splitting primitives.

use uuid::Uuid;

/// Maximum gap tolerated between an expense total and the sum of its splits.
pub const SPLIT_TOLERANCE: f64 = 0.01;

/// Residual amounts up to half a minor unit are treated as settled.
pub const NETTING_EPSILON: f64 = 0.005;

/// Absorbs binary noise around [`NETTING_EPSILON`] itself.
const FLOAT_SLACK: f64 = 1e-9;

/// Number of minor units per major currency unit.
pub const MINOR_UNITS: f64 = 100.0;

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a fresh opaque identifier for groups and expenses.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Rounds a currency amount to minor-unit precision.
pub fn round_currency(value: f64) -> f64 {
    (value * MINOR_UNITS).round() / MINOR_UNITS
}

/// Returns whether two amounts differ by at most [`NETTING_EPSILON`].
pub fn amounts_match(left: f64, right: f64) -> bool {
    (left - right).abs() <= NETTING_EPSILON + FLOAT_SLACK
}

/// Normalizes a member name for storage and comparison.
pub fn normalize_member(name: &str) -> String {
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_currency_keeps_two_decimals() {
        assert_eq!(round_currency(10.004), 10.0);
        assert_eq!(round_currency(10.006), 10.01);
        assert_eq!(round_currency(0.1 + 0.2), 0.3);
    }

    #[test]
    fn amounts_match_absorbs_float_noise() {
        assert!(amounts_match(0.1 + 0.2, 0.3));
        assert!(!amounts_match(1.0, 1.01));
        assert!(!amounts_match(0.0, 0.006));
    }

    #[test]
    fn half_a_minor_unit_still_matches() {
        assert!(amounts_match(0.13, 0.125));
        assert!(amounts_match(0.0, 0.005));
    }

    #[test]
    fn new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
