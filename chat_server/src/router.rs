//! Inbound chat line handling.
//!
//! [`CommandRouter::handle`] classifies a line with [`ChatCommand::parse`]:
//! - plain text comes back unchanged, with no side effects;
//! - `exchange` with an unusable day count becomes [`INVALID_DAYS_REPLY`] without touching
//!   the provider or the audit log;
//! - a valid `exchange [days]` is aggregated on the [`WorkerPool`], rendered, and recorded
//!   in the audit log exactly once, whether or not every day could be fetched.

use crate::audit::AuditLog;
use crate::exchange::RateAggregator;
use crate::worker_pool::WorkerPool;
use chat_common::command::INVALID_DAYS_REPLY;
use chat_common::{ChatCommand, RateQuery};
use chrono::Local;
use log::{error, info};
use std::sync::Arc;

/// Reply used when the aggregation job itself could not complete.
pub const EXCHANGE_FAILED_REPLY: &str = "Не вдалося отримати курси валют";

/// Stateless translator from inbound chat lines to outbound text.
pub struct CommandRouter {
    aggregator: Arc<RateAggregator>,
    pool: Arc<WorkerPool>,
    audit: Arc<dyn AuditLog>,
}

impl CommandRouter {
    /// Wire a router to its collaborators.
    pub fn new(
        aggregator: Arc<RateAggregator>,
        pool: Arc<WorkerPool>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            aggregator,
            pool,
            audit,
        }
    }

    /// Produce the text to broadcast for `raw`.
    pub fn handle(&self, raw: &str) -> String {
        match ChatCommand::parse(raw) {
            ChatCommand::Text(text) => text.to_string(),
            ChatCommand::InvalidExchange => INVALID_DAYS_REPLY.to_string(),
            ChatCommand::Exchange(query) => self.exchange(query),
        }
    }

    fn exchange(&self, query: RateQuery) -> String {
        info!("Exchange requested for {} day(s)", query.days());
        let aggregator = Arc::clone(&self.aggregator);
        let rendered = self
            .pool
            .run(move || aggregator.aggregate(query))
            .and_then(|result| result.render());
        let reply = match rendered {
            Ok(text) => text,
            Err(e) => {
                error!("Exchange command failed: {}", e);
                EXCHANGE_FAILED_REPLY.to_string()
            }
        };

        if let Err(e) = self.audit.append(Local::now().naive_local()) {
            error!("Failed to write exchange audit log: {}", e);
        }
        reply
    }
}
