//! Exchange-rate data model and its chat rendering.
//!
//! A provider answers one request per calendar day with a [`ProviderDay`]. Only whitelisted
//! currencies survive the conversion into [`DateRates`]; a sale or purchase rate the
//! provider leaves out stays `None` rather than becoming a made-up number. An
//! [`AggregateResult`] collects the days of one exchange command keyed by date and renders
//! itself as a JSON object, newest day first:
//!
//! ```text
//! {"17.10.2026":{"EUR":{"sale":41.2,"purchase":40.5},"USD":{"sale":null,"purchase":37.1}}}
//! ```

use chat_common::currency::Currency;
use chat_common::{ChatError, Result};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Date format used by the provider, both in requests and in its `date` field.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Sale and purchase rate of one currency on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rate {
    /// Price at which the bank sells the currency, if published.
    pub sale: Option<f64>,
    /// Price at which the bank buys the currency, if published.
    pub purchase: Option<f64>,
}

/// Whitelisted rates published for a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRates {
    /// Day the provider reports the rates for.
    pub date: NaiveDate,
    /// Rates keyed by currency.
    pub rates: BTreeMap<Currency, Rate>,
}

/// Raw provider answer for one day.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDay {
    /// Day in `dd.mm.yyyy` form.
    pub date: String,
    /// Every currency record the provider knows about.
    #[serde(default)]
    pub exchange_rate: Vec<ProviderRate>,
}

/// Raw provider record for one currency.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRate {
    /// Currency code; the provider omits it on its base-currency record.
    pub currency: Option<String>,
    /// Bank sale rate.
    pub sale_rate: Option<f64>,
    /// Bank purchase rate.
    pub purchase_rate: Option<f64>,
}

impl DateRates {
    /// Convert a provider payload, keeping only whitelisted currencies.
    pub fn from_provider(day: ProviderDay) -> Result<Self> {
        let date = NaiveDate::parse_from_str(day.date.trim(), DATE_FORMAT)
            .map_err(|e| ChatError::Format(format!("bad date {:?}: {}", day.date, e)))?;

        let rates = day
            .exchange_rate
            .into_iter()
            .filter_map(|record| {
                let currency = Currency::from_code(record.currency.as_deref()?)?;
                Some((
                    currency,
                    Rate {
                        sale: record.sale_rate,
                        purchase: record.purchase_rate,
                    },
                ))
            })
            .collect();

        Ok(Self { date, rates })
    }
}

/// Rates collected by one exchange command, one entry per day that was fetched successfully.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    days: BTreeMap<NaiveDate, BTreeMap<Currency, Rate>>,
}

impl AggregateResult {
    /// Add (or replace) the rates of one day.
    pub fn insert(&mut self, day: DateRates) {
        self.days.insert(day.date, day.rates);
    }

    /// Rates recorded for `date`.
    pub fn get(&self, date: &NaiveDate) -> Option<&BTreeMap<Currency, Rate>> {
        self.days.get(date)
    }

    /// Days present in the result, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    /// Number of days present.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// `true` when no fetch succeeded.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Chat text for the result: a JSON object keyed by `dd.mm.yyyy`, newest day first.
    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (date, rates) in self.days.iter().rev() {
            let rates: BTreeMap<String, &Rate> =
                rates.iter().map(|(c, r)| (c.to_string(), r)).collect();
            map.serialize_entry(&date.format(DATE_FORMAT).to_string(), &rates)?;
        }
        map.end()
    }
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "date": "01.12.2022",
        "bank": "PB",
        "baseCurrency": 980,
        "baseCurrencyLit": "UAH",
        "exchangeRate": [
            {"baseCurrency": "UAH", "saleRateNB": 1.0, "purchaseRateNB": 1.0},
            {"baseCurrency": "UAH", "currency": "CHF", "saleRateNB": 38.9, "purchaseRateNB": 38.9, "saleRate": 40.0, "purchaseRate": 38.0},
            {"baseCurrency": "UAH", "currency": "EUR", "saleRateNB": 38.3, "purchaseRateNB": 38.3, "saleRate": 40.7, "purchaseRate": 39.7},
            {"baseCurrency": "UAH", "currency": "USD", "saleRateNB": 36.5, "purchaseRateNB": 36.5}
        ]
    }"#;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keeps_whitelisted_currencies_only() {
        let parsed: ProviderDay = serde_json::from_str(PAYLOAD).unwrap();
        let rates = DateRates::from_provider(parsed).unwrap();

        assert_eq!(rates.date, day(2022, 12, 1));
        assert_eq!(rates.rates.len(), 2);
        assert_eq!(
            rates.rates[&Currency::EUR],
            Rate { sale: Some(40.7), purchase: Some(39.7) }
        );
    }

    #[test]
    fn missing_rates_stay_absent() {
        let parsed: ProviderDay = serde_json::from_str(PAYLOAD).unwrap();
        let rates = DateRates::from_provider(parsed).unwrap();

        assert_eq!(rates.rates[&Currency::USD], Rate { sale: None, purchase: None });
    }

    #[test]
    fn rejects_unparseable_date() {
        let parsed: ProviderDay =
            serde_json::from_str(r#"{"date": "2022-12-01", "exchangeRate": []}"#).unwrap();
        assert!(matches!(DateRates::from_provider(parsed), Err(ChatError::Format(_))));
    }

    #[test]
    fn renders_newest_day_first() {
        let mut result = AggregateResult::default();
        for d in [1, 2] {
            let mut rates = BTreeMap::new();
            rates.insert(Currency::USD, Rate { sale: Some(37.5), purchase: None });
            result.insert(DateRates { date: day(2022, 12, d), rates });
        }

        assert_eq!(
            result.to_string(),
            r#"{"02.12.2022":{"USD":{"sale":37.5,"purchase":null}},"01.12.2022":{"USD":{"sale":37.5,"purchase":null}}}"#
        );
    }

    #[test]
    fn empty_result_renders_as_empty_object() {
        assert_eq!(AggregateResult::default().render().unwrap(), "{}");
        assert_eq!(AggregateResult::default().to_string(), "{}");
    }
}
