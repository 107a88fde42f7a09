//! Fan-out/fan-in over the days of one exchange command.
//!
//! [`RateAggregator::aggregate`] turns a [`RateQuery`] into `days` consecutive calendar
//! dates ending today, fetches every date on its own scoped thread and waits for all of
//! them to settle before building the [`AggregateResult`]. A date whose fetch fails is
//! left out of the result; the remaining dates are still reported. A provider that
//! panics is a bug rather than a failed fetch: once all dates have settled the panic is
//! resumed on the calling thread.
//!
//! There is no limit beyond the query clamp: at most [`chat_common::command::MAX_DAYS`]
//! fetches run at once per command. Nothing times out here either; a fetch that never
//! returns keeps its command waiting unless the provider enforces a timeout.

use crate::exchange::client::RateProvider;
use crate::model::rates::AggregateResult;
use chat_common::RateQuery;
use chrono::{Days, Local, NaiveDate};
use log::{debug, error, warn};
use std::panic;
use std::sync::Arc;
use std::thread;

/// Builds multi-day rate tables from a [`RateProvider`].
pub struct RateAggregator {
    provider: Arc<dyn RateProvider>,
}

impl RateAggregator {
    /// Create an aggregator over `provider`.
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    /// Aggregate rates for the query, counting back from the local current date.
    pub fn aggregate(&self, query: RateQuery) -> AggregateResult {
        self.aggregate_from(Local::now().date_naive(), query)
    }

    /// Aggregate rates for the query, counting back from `today`.
    pub fn aggregate_from(&self, today: NaiveDate, query: RateQuery) -> AggregateResult {
        let dates = request_dates(today, query);
        let provider = &self.provider;

        let settled: Vec<_> = thread::scope(|scope| {
            let pending: Vec<_> = dates
                .iter()
                .map(|&date| (date, scope.spawn(move || provider.fetch(date))))
                .collect();

            pending
                .into_iter()
                .map(|(date, handle)| (date, handle.join()))
                .collect()
        });

        let mut result = AggregateResult::default();
        let mut fault = None;
        for (date, outcome) in settled {
            match outcome {
                Ok(Ok(day)) => result.insert(day),
                Ok(Err(e)) => warn!("Dropping {} from the exchange result: {}", date, e),
                Err(payload) => {
                    error!("Rate provider panicked while fetching {}", date);
                    fault.get_or_insert(payload);
                }
            }
        }
        // Every fetch has settled; a provider panic fails the whole command.
        if let Some(payload) = fault {
            panic::resume_unwind(payload);
        }
        debug!("Aggregated {} of {} requested days", result.len(), dates.len());
        result
    }
}

/// Dates covered by `query`: `today`, `today - 1`, ... in that order.
pub fn request_dates(today: NaiveDate, query: RateQuery) -> Vec<NaiveDate> {
    (0..query.days() as u64)
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}
