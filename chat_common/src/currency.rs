//! Currencies reported by the exchange command.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Whitelisted currency codes; every other code in a provider payload is dropped.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
pub enum Currency {
    EUR,
    USD,
}

impl Currency {
    /// Resolve a provider currency code, returning `None` for anything off the whitelist.
    pub fn from_code(code: &str) -> Option<Self> {
        code.trim().parse().ok()
    }
}
