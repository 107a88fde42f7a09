//! Command-line arguments for the chat client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use chat_common::net::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct ClientArgs {
    /// Host name or IP address where the chat server is running.
    #[clap(long, default_value = DEFAULT_HOST)]
    pub server_ip: String,

    /// WebSocket port of the chat server.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}
