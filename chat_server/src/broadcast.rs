//! Delivery of one chat line to every connection.
use crate::registry::ConnectionRegistry;
use log::{debug, warn};

/// Fans a chat line out to every registered connection.
///
/// Delivery goes through each connection's outbound queue, so a broadcast never waits on a
/// socket. A recipient whose queue is closed is skipped and logged; the remaining
/// recipients still get the message and the sender never sees the failure.
pub struct Broadcaster;

impl Broadcaster {
    /// Queue `message` for every current member of `registry`, the sender included.
    /// Returns the number of connections the message was queued for.
    pub fn broadcast(message: &str, registry: &ConnectionRegistry) -> usize {
        let recipients = registry.snapshot();
        let mut delivered = 0;
        for connection in &recipients {
            match connection.send(message) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to deliver to {}: {}", connection.addr(), e),
            }
        }
        debug!("Broadcast queued for {}/{} connections", delivered, recipients.len());
        delivered
    }
}
