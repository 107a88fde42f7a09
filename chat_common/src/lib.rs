//!
//! Common types and utilities shared by the chat server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `ChatError` used across the workspace.
//! - `result` — handy `Result<T, ChatError>` alias.
//! - `currency` — the whitelist of currencies reported by the exchange command.
//! - `command` — grammar of inbound chat lines (plain text vs. `exchange [days]`).
//! - `net` — networking defaults and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod result;
pub mod currency;
pub mod command;
pub mod net;

pub use error::ChatError;
pub use result::Result;
pub use command::{ChatCommand, RateQuery};
