//! Domain models for the chat server.
//!
//! - `rates` — per-date currency rates, the provider payload they are parsed from,
//!   and the aggregate that an exchange command renders into the chat.

pub mod rates;
