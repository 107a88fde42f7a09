//! Message transport seen by a connection's receive loop.
//!
//! [`Transport`] is the only view [`crate::lifecycle::ConnectionLifecycle`] has of a
//! client. [`WsTransport`] is the WebSocket implementation: reads wait at most one poll
//! interval, so the loop regularly gets a chance to flush the connection's outbound queue.

use chat_common::{ChatError, Result};
use log::debug;
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;
use tungstenite::error::ProtocolError;
use tungstenite::{Message, WebSocket};

/// Outcome of one receive attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A chat line from the client.
    Text(String),
    /// Nothing arrived within the poll interval (or only control frames did).
    Idle,
    /// The client closed the connection.
    Closed,
}

/// Bidirectional text channel to one client.
pub trait Transport {
    /// Remote address, for logging.
    fn peer_addr(&self) -> SocketAddr;

    /// Wait briefly for the next inbound message.
    fn recv(&mut self) -> Result<Inbound>;

    /// Deliver one text message to the client.
    fn send(&mut self, text: &str) -> Result<()>;
}

/// WebSocket connection over a plain TCP stream.
pub struct WsTransport {
    socket: WebSocket<TcpStream>,
    peer: SocketAddr,
}

impl WsTransport {
    /// Complete the server side of the WebSocket handshake on `stream`.
    pub fn accept(stream: TcpStream, poll_interval: Duration) -> Result<Self> {
        let peer = stream.peer_addr()?;
        let socket =
            tungstenite::accept(stream).map_err(|e| ChatError::Handshake(e.to_string()))?;
        socket.get_ref().set_read_timeout(Some(poll_interval))?;
        Ok(Self { socket, peer })
    }

    fn flush(&mut self) -> Result<Inbound> {
        match self.socket.flush() {
            Ok(()) => Ok(Inbound::Idle),
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(Inbound::Closed)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Transport for WsTransport {
    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    fn recv(&mut self) -> Result<Inbound> {
        match self.socket.read() {
            Ok(Message::Text(text)) => Ok(Inbound::Text(text.as_str().to_string())),
            Ok(Message::Close(frame)) => {
                debug!("{} sent close frame {:?}", self.peer, frame);
                // Push out the queued close reply; the peer may already be gone.
                let _ = self.socket.flush();
                Ok(Inbound::Closed)
            }
            // Pings are answered by the library; binary frames are not chat.
            Ok(_) => self.flush(),
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                self.flush()
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(Inbound::Closed)
            }
            Err(tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake)) => {
                debug!("{} dropped without closing handshake", self.peer);
                Ok(Inbound::Closed)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn send(&mut self, text: &str) -> Result<()> {
        self.socket.send(Message::Text(text.to_string().into()))?;
        Ok(())
    }
}
