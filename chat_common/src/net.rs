//! Shared networking constants and helpers used by client and server.

/// Host the chat server binds to unless told otherwise.
pub const DEFAULT_HOST: &str = "localhost";
/// WebSocket port of the chat server.
pub const DEFAULT_PORT: u16 = 5000;

/// Helper to format a host and port like "host:port".
pub fn addr(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

/// WebSocket URL of a chat server listening on `host:port`.
pub fn ws_url(host: &str, port: u16) -> String {
    format!("ws://{}", addr(host, port))
}
