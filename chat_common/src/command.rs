//! Grammar of inbound chat lines.
//!
//! Every line a client sends is either free chat text or an exchange command:
//!
//! ```text
//! exchange [<days>]
//! ```
//!
//! `<days>` is a base-10 integer. It defaults to 1 when missing and is clamped to
//! [`MAX_DAYS`]. A non-numeric or non-positive value makes the line an
//! [`ChatCommand::InvalidExchange`], which the server answers with
//! [`INVALID_DAYS_REPLY`] instead of a rate table.

use std::num::IntErrorKind;

/// Leading token that turns a chat line into an exchange command.
pub const EXCHANGE_TOKEN: &str = "exchange";
/// Upper bound on the number of days one exchange command may request.
pub const MAX_DAYS: u32 = 10;
/// Fixed reply for an exchange command whose day count cannot be used.
pub const INVALID_DAYS_REPLY: &str = "Введіть кількість днів (не більше 10)";

/// Validated day count of an exchange command, always within `1..=MAX_DAYS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuery {
    days: u32,
}

impl RateQuery {
    /// Build a query for `days` days back from today.
    ///
    /// Values above [`MAX_DAYS`] are reduced to it; zero or negative values yield `None`.
    pub fn new(days: i64) -> Option<Self> {
        if days < 1 {
            return None;
        }
        let days = days.min(MAX_DAYS as i64) as u32;
        Some(Self { days })
    }

    /// Number of calendar days to fetch, today included.
    pub fn days(&self) -> u32 {
        self.days
    }
}

impl Default for RateQuery {
    fn default() -> Self {
        Self { days: 1 }
    }
}

/// Classified inbound chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand<'a> {
    /// Plain chat text, relayed unchanged.
    Text(&'a str),
    /// A well-formed exchange command.
    Exchange(RateQuery),
    /// `exchange` followed by an argument that is not a usable day count.
    InvalidExchange,
}

impl<'a> ChatCommand<'a> {
    /// Classify a raw chat line.
    pub fn parse(raw: &'a str) -> Self {
        let mut tokens = raw.split_whitespace();
        if tokens.next() != Some(EXCHANGE_TOKEN) {
            return ChatCommand::Text(raw);
        }
        match tokens.next() {
            None => ChatCommand::Exchange(RateQuery::default()),
            Some(arg) => parse_days(arg)
                .and_then(RateQuery::new)
                .map(ChatCommand::Exchange)
                .unwrap_or(ChatCommand::InvalidExchange),
        }
    }
}

/// Read a day count; a positive number too large for `i64` still counts as "a lot".
fn parse_days(arg: &str) -> Option<i64> {
    match arg.parse::<i64>() {
        Ok(days) => Some(days),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(MAX_DAYS as i64),
        Err(_) => None,
    }
}
