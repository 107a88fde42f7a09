//! Upstream rate provider access.
use crate::model::rates::{DATE_FORMAT, DateRates, ProviderDay};
use chat_common::{ChatError, Result};
use chrono::NaiveDate;
use log::info;
use std::time::Duration;

/// Public PrivatBank archive endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Source of per-day exchange rates.
///
/// Implementations perform a single attempt; every failure (network, status, payload) is
/// reported as [`ChatError::Fetch`] carrying the requested date.
pub trait RateProvider: Send + Sync {
    /// Fetch the whitelisted rates published for `date`.
    fn fetch(&self, date: NaiveDate) -> Result<DateRates>;
}

/// Blocking HTTP client for the PrivatBank archive API.
pub struct PrivatBankClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl PrivatBankClient {
    /// Create a client for `base_url`.
    ///
    /// With `timeout` set to `None` a request may wait indefinitely for the provider.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Format(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, date: NaiveDate) -> String {
        format!("{}?json&date={}", self.base_url, date.format(DATE_FORMAT))
    }
}

impl RateProvider for PrivatBankClient {
    fn fetch(&self, date: NaiveDate) -> Result<DateRates> {
        info!("Loading {}", date.format(DATE_FORMAT));
        let day: ProviderDay = self
            .http
            .get(self.url_for(date))
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json())
            .map_err(|e| ChatError::fetch(date, e))?;

        DateRates::from_provider(day).map_err(|e| ChatError::fetch(date, e))
    }
}
