//! Per-connection lifecycle.
//!
//! A connection moves through `Connecting -> Registered -> Receiving -> Closed`:
//! [`ConnectionLifecycle::run`] registers it, then loops, alternating between flushing
//! the connection's outbound queue and waiting for its next inbound line. Each inbound
//! line goes through the [`CommandRouter`] and is broadcast as `<name>: <text>` to every
//! connection, the sender included. The loop ends on close, on a transport error, or by
//! unwinding; in all three cases the [`crate::registry::Registration`] guard removes the
//! connection from the registry exactly once.
//!
//! Lines from one client are handled strictly in arrival order. A slow exchange command
//! only holds up its own connection; others keep chatting on their own threads.

use crate::broadcast::Broadcaster;
use crate::registry::ConnectionRegistry;
use crate::router::CommandRouter;
use crate::transport::{Inbound, Transport};
use chat_common::Result;
use crossbeam_channel::unbounded;
use std::sync::Arc;

/// Shared wiring every connection thread runs with.
#[derive(Clone)]
pub struct ConnectionLifecycle {
    registry: Arc<ConnectionRegistry>,
    router: Arc<CommandRouter>,
}

impl ConnectionLifecycle {
    /// Bundle the registry and router for connection threads.
    pub fn new(registry: Arc<ConnectionRegistry>, router: Arc<CommandRouter>) -> Self {
        Self { registry, router }
    }

    /// Registry the connections are tracked in.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Serve one client until it disconnects.
    ///
    /// Transport errors are returned after the connection has been unregistered; they
    /// never affect other connections.
    pub fn run<T: Transport>(&self, mut transport: T) -> Result<()> {
        let (outbox_tx, outbox_rx) = unbounded::<String>();
        let registration = self.registry.enter(transport.peer_addr(), outbox_tx);
        let name = registration.connection().name().to_string();

        loop {
            for message in outbox_rx.try_iter() {
                transport.send(&message)?;
            }
            match transport.recv()? {
                Inbound::Text(line) => {
                    let text = self.router.handle(&line);
                    Broadcaster::broadcast(&format!("{}: {}", name, text), &self.registry);
                }
                Inbound::Idle => {}
                Inbound::Closed => break,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::RateAggregator;
    use crate::testing::{CountingAudit, StubProvider, sequential_names};
    use crate::worker_pool::WorkerPool;
    use chat_common::ChatError;
    use std::collections::VecDeque;
    use std::net::SocketAddr;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Mutex;

    /// Plays back a fixed inbound script, then reports the connection closed.
    struct ScriptedTransport {
        script: VecDeque<Result<Inbound>>,
        sent: Arc<Mutex<Vec<String>>>,
        panic_when_done: bool,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<Inbound>>) -> (Self, Arc<Mutex<Vec<String>>>) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let transport = Self {
                script: script.into(),
                sent: Arc::clone(&sent),
                panic_when_done: false,
            };
            (transport, sent)
        }
    }

    impl Transport for ScriptedTransport {
        fn peer_addr(&self) -> SocketAddr {
            SocketAddr::from(([127, 0, 0, 1], 40000))
        }

        fn recv(&mut self) -> Result<Inbound> {
            match self.script.pop_front() {
                Some(step) => step,
                None if self.panic_when_done => panic!("transport fault"),
                None => Ok(Inbound::Closed),
            }
        }

        fn send(&mut self, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn lifecycle() -> ConnectionLifecycle {
        let router = CommandRouter::new(
            Arc::new(RateAggregator::new(Arc::new(StubProvider::default()))),
            Arc::new(WorkerPool::new(1, 4).unwrap()),
            Arc::new(CountingAudit::default()),
        );
        ConnectionLifecycle::new(
            Arc::new(ConnectionRegistry::new(Arc::new(sequential_names()))),
            Arc::new(router),
        )
    }

    fn text(line: &str) -> Result<Inbound> {
        Ok(Inbound::Text(line.to_string()))
    }

    #[test]
    fn sender_receives_own_lines_in_order() {
        let lifecycle = lifecycle();
        let (transport, sent) = ScriptedTransport::new(vec![
            text("hello"),
            Ok(Inbound::Idle),
            text("exchange abc"),
            Ok(Inbound::Idle),
        ]);

        lifecycle.run(transport).unwrap();

        assert_eq!(
            *sent.lock().unwrap(),
            vec![
                "User 1: hello".to_string(),
                format!("User 1: {}", chat_common::command::INVALID_DAYS_REPLY),
            ]
        );
        assert!(lifecycle.registry().is_empty());
    }

    #[test]
    fn other_connections_receive_prefixed_lines() {
        let lifecycle = lifecycle();
        let (tx, rx) = unbounded();
        let listener = lifecycle
            .registry()
            .register(SocketAddr::from(([127, 0, 0, 1], 40001)), tx);
        let (transport, _sent) = ScriptedTransport::new(vec![text("hi all")]);

        lifecycle.run(transport).unwrap();

        assert_eq!(listener.name(), "User 1");
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["User 2: hi all"]);
        assert_eq!(lifecycle.registry().len(), 1);
    }

    #[test]
    fn transport_error_still_unregisters() {
        let lifecycle = lifecycle();
        let (transport, _sent) = ScriptedTransport::new(vec![
            text("before"),
            Err(ChatError::Format("malformed frame".to_string())),
            text("never read"),
        ]);

        assert!(lifecycle.run(transport).is_err());
        assert!(lifecycle.registry().is_empty());
    }

    #[test]
    fn fault_in_loop_still_unregisters() {
        let lifecycle = lifecycle();
        let (mut transport, _sent) = ScriptedTransport::new(vec![text("last words")]);
        transport.panic_when_done = true;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| lifecycle.run(transport)));

        assert!(outcome.is_err());
        assert!(lifecycle.registry().is_empty());
    }
}
