//! Splitbook tracks shared group expenses and settles who owes whom.
//!
//! The settlement engine, group services, storage, and configuration live in
//! the `splitbook-*` crates; this crate wires them into a command shell.

pub mod cli;
pub mod errors;
pub mod utils;

pub use splitbook_config as config;
pub use splitbook_core as core;
pub use splitbook_domain as domain;
pub use splitbook_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Splitbook tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
