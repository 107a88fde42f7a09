//! Foreign-exchange lookups behind the `exchange` chat command.
//!
//! - `client` — one request per calendar day against the rate provider.
//! - `aggregator` — fans a command out into one concurrent fetch per requested day.

pub mod aggregator;
pub mod client;

pub use aggregator::RateAggregator;
pub use client::{PrivatBankClient, RateProvider};
