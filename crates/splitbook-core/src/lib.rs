//! splitbook-core
//!
//! Settlement engine and group services for Splitbook.
//! Depends on splitbook-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod balance_service;
pub mod entry_service;
pub mod error;
pub mod format;
pub mod group_service;
pub mod settlement;
pub mod storage;

pub use balance_service::*;
pub use entry_service::*;
pub use error::CoreError;
pub use group_service::*;
pub use settlement::*;
