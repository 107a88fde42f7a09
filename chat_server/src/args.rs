//! Command-line configuration of the chat server.
use crate::exchange::client::DEFAULT_PROVIDER_URL;
use chat_common::net::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct ServerArgs {
    /// Host name or IP address to listen on.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// WebSocket port.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// File that receives one timestamp per served exchange command.
    #[clap(long, default_value = "log_exchange.txt")]
    pub audit_log: PathBuf,

    /// Worker threads available for exchange lookups.
    #[clap(long, default_value_t = 3)]
    pub workers: usize,

    /// Base URL of the exchange-rate archive.
    #[clap(long, default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,

    /// Give up on a single rate request after this many seconds (no limit by default).
    #[clap(long)]
    pub fetch_timeout_secs: Option<u64>,

    /// How long a connection waits for input before flushing its outbound queue.
    #[clap(long, default_value_t = 25)]
    pub poll_interval_ms: u64,
}

impl ServerArgs {
    /// Per-request timeout for the rate provider, if any.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    /// Read timeout of a connection's socket.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
