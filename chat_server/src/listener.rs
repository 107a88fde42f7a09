//! WebSocket accept loop.
use crate::lifecycle::ConnectionLifecycle;
use crate::transport::WsTransport;
use chat_common::Result;
use log::{error, info};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// WebSocket acceptor that gives every client its own connection thread.
///
/// A failed handshake or a broken connection is logged and ends only that client's
/// thread; the accept loop keeps serving everyone else.
pub struct ChatListener {
    socket: TcpListener,
    poll_interval: Duration,
}

impl ChatListener {
    /// Bind a new listener to `bind_addr` (e.g., `localhost:5000`).
    pub fn bind(bind_addr: &str, poll_interval: Duration) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self {
            socket,
            poll_interval,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop accepting clients and running `lifecycle` for each of them.
    pub fn serve(self, lifecycle: ConnectionLifecycle) -> Result<()> {
        info!("Chat server is started on ws://{}", self.socket.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let lifecycle = lifecycle.clone();
                    let poll_interval = self.poll_interval;
                    let spawned = thread::Builder::new()
                        .name("connection".to_string())
                        .spawn(move || {
                            if let Err(e) = serve_client(stream, poll_interval, &lifecycle) {
                                error!("Client connection error: {}", e);
                            }
                        });
                    if let Err(e) = spawned {
                        error!("Failed to spawn connection thread: {}", e);
                    }
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

fn serve_client(
    stream: TcpStream,
    poll_interval: Duration,
    lifecycle: &ConnectionLifecycle,
) -> Result<()> {
    let transport = WsTransport::accept(stream, poll_interval)?;
    lifecycle.run(transport)
}
