//! splitbook-domain
//!
//! Pure domain models (Group, Expense, Split, NetDebt).
//! No I/O, no CLI, no storage. Only data types and shared traits.

pub mod common;
pub mod debt;
pub mod expense;
pub mod group;

pub use common::*;
pub use debt::*;
pub use expense::*;
pub use group::*;
