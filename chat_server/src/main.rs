//! Chat hub server binary.
//!
//! Wires the components together and runs the accept loop forever:
//! random display names, the PrivatBank rate client, a worker pool for exchange
//! lookups, and a file-backed audit log.
use chat_common::ChatError;
use chat_common::net::addr;
use chat_server::args::ServerArgs;
use chat_server::audit::FileAuditLog;
use chat_server::exchange::{PrivatBankClient, RateAggregator};
use chat_server::lifecycle::ConnectionLifecycle;
use chat_server::listener::ChatListener;
use chat_server::names::RandomNames;
use chat_server::registry::ConnectionRegistry;
use chat_server::router::CommandRouter;
use chat_server::worker_pool::{DEFAULT_QUEUE_CAPACITY, WorkerPool};
use clap::Parser;
use log::info;
use std::sync::Arc;

fn main() -> Result<(), ChatError> {
    init_logger();
    let args = ServerArgs::parse();

    let provider = Arc::new(PrivatBankClient::new(&args.provider_url, args.fetch_timeout())?);
    let pool = Arc::new(WorkerPool::new(args.workers, DEFAULT_QUEUE_CAPACITY)?);
    info!(
        "Exchange lookups run on {} workers; audit log at {}",
        pool.size(),
        args.audit_log.display()
    );
    let router = CommandRouter::new(
        Arc::new(RateAggregator::new(provider)),
        pool,
        Arc::new(FileAuditLog::new(&args.audit_log)),
    );
    let registry = Arc::new(ConnectionRegistry::new(Arc::new(RandomNames)));
    let lifecycle = ConnectionLifecycle::new(registry, Arc::new(router));

    let listener = ChatListener::bind(&addr(&args.host, args.port), args.poll_interval())?;
    listener.serve(lifecycle)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
