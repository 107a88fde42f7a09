//! Real-time chat hub with an exchange-rate command.
//!
//! Clients connect over WebSocket and every line they send is broadcast to all connected
//! clients as `<display name>: <text>`. A line of the form `exchange [days]` is replaced by
//! a table of EUR/USD rates for the last `days` days (at most 10), looked up concurrently
//! from the PrivatBank archive on a bounded worker pool.
//!
//! Building blocks, leaves first:
//!
//! - `exchange::client` — `RateProvider` and its HTTP implementation, one request per day.
//! - `exchange::aggregator` — concurrent fan-out over the requested days.
//! - `registry` — the shared set of live connections.
//! - `broadcast` — delivery of one line to every connection.
//! - `worker_pool` — bounded offload of exchange lookups.
//! - `router` — classifies inbound lines and builds the text to broadcast.
//! - `lifecycle` — register, receive loop, guaranteed unregister.
//! - `transport` / `listener` — the WebSocket side.
#![warn(missing_docs)]

pub mod args;
pub mod audit;
pub mod broadcast;
pub mod exchange;
pub mod lifecycle;
pub mod listener;
pub mod model;
pub mod names;
pub mod registry;
pub mod router;
pub mod transport;
pub mod worker_pool;

#[cfg(test)]
pub(crate) mod testing;
