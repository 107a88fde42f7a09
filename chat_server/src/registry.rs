//! Registry of live chat connections.
//!
//! The registry is the only mutable state shared between connection threads. It is
//! owned explicitly (usually behind an `Arc`) and handed to whoever needs it. Members
//! are keyed by a process-unique [`ConnectionId`], never by display name, since names
//! may repeat.
//!
//! - `register` names a connection and adds it.
//! - `unregister` removes it; removing an absent id is a no-op.
//! - `snapshot` copies the current members so a broadcast can iterate without holding
//!   the lock while other threads join or leave.
//!
//! [`Registration`] ties membership to a scope: it unregisters on drop, so a connection
//! leaves the registry on every exit path of its receive loop, unwinding included.

use crate::names::NameGenerator;
use chat_common::{ChatError, Result};
use crossbeam_channel::Sender;
use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-unique identity of a connection.
pub type ConnectionId = u64;

/// Registry entry: a named handle to one client's outbound queue.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    name: String,
    addr: SocketAddr,
    outbox: Sender<String>,
}

impl Connection {
    /// Identity used as the registry key.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Display name assigned at registration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote address of the client.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queue `message` for delivery; fails once the connection's loop has gone away.
    pub fn send(&self, message: &str) -> Result<()> {
        self.outbox
            .send(message.to_string())
            .map_err(|_| ChatError::ChannelSend(format!("{} ({}) is gone", self.name, self.addr)))
    }
}

/// Concurrency-safe set of connected clients.
pub struct ConnectionRegistry {
    names: Arc<dyn NameGenerator>,
    next_id: AtomicU64,
    members: Mutex<HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    /// Create an empty registry naming new members with `names`.
    pub fn new(names: Arc<dyn NameGenerator>) -> Self {
        Self {
            names,
            next_id: AtomicU64::new(1),
            members: Mutex::new(HashMap::new()),
        }
    }

    fn members(&self) -> MutexGuard<'_, HashMap<ConnectionId, Connection>> {
        // Every critical section is a single map operation, so a poisoned map is still whole.
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Name a new connection and add it to the registry.
    pub fn register(&self, addr: SocketAddr, outbox: Sender<String>) -> Connection {
        let connection = Connection {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: self.names.generate(),
            addr,
            outbox,
        };
        self.members().insert(connection.id, connection.clone());
        info!("{} connects as {}", addr, connection.name);
        connection
    }

    /// Register a connection for as long as the returned guard lives.
    pub fn enter(&self, addr: SocketAddr, outbox: Sender<String>) -> Registration<'_> {
        let connection = self.register(addr, outbox);
        Registration {
            registry: self,
            connection,
        }
    }

    /// Remove a connection. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        match self.members().remove(&id) {
            Some(connection) => {
                info!("{} disconnects", connection.addr);
                true
            }
            None => false,
        }
    }

    /// Copy of the current members, in no particular order.
    pub fn snapshot(&self) -> Vec<Connection> {
        self.members().values().cloned().collect()
    }

    /// Whether `id` is currently registered.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members().contains_key(&id)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.members().len()
    }

    /// `true` when nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scoped membership returned by [`ConnectionRegistry::enter`].
pub struct Registration<'a> {
    registry: &'a ConnectionRegistry,
    connection: Connection,
}

impl Registration<'_> {
    /// The registered connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.unregister(self.connection.id);
    }
}
