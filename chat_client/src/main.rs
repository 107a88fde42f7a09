//! Chat Client — an interactive terminal client for the chat hub. Every line typed on
//! stdin is sent to the server; every line the server broadcasts is printed to stdout.
//!
//! Usage example (CLI):
//! ```bash
//! chat_client --server-ip 192.168.0.10 --port 5000
//! ```
//!
//! Typing `exchange 3` asks the server for EUR/USD rates of the last three days; the
//! answer arrives like any other chat line.
#![warn(missing_docs)]
mod args;
mod input;

use crate::args::ClientArgs;
use chat_common::ChatError;
use chat_common::Result;
use chat_common::net::ws_url;
use clap::Parser;
use crossbeam_channel::Receiver;
use log::info;
use std::io::ErrorKind;
use std::net::TcpStream;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// How long a socket read waits before the loop checks for typed lines again.
const READ_TIMEOUT_MS: u64 = 50;

/// Alternate between sending typed lines and printing received ones until the server
/// closes the connection or `shutdown` is set.
fn run_chat_loop(
    socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
    lines: &Receiver<String>,
    shutdown: &AtomicBool,
) -> Result<(), ChatError> {
    while !shutdown.load(Ordering::Relaxed) {
        for line in lines.try_iter() {
            socket.send(Message::Text(line.into()))?;
        }
        match socket.read() {
            Ok(Message::Text(text)) => println!("{}", text.as_str()),
            Ok(Message::Close(_)) => {
                info!("Server closed the connection");
                break;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn main() -> Result<(), ChatError> {
    init_logger();
    let args = ClientArgs::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| ChatError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let url = ws_url(args.server_ip.trim(), args.port);
    info!("Connecting to chat server at {}", url);
    let (mut socket, _response) = tungstenite::connect(url.as_str())?;
    if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
        stream.set_read_timeout(Some(Duration::from_millis(READ_TIMEOUT_MS)))?;
    }

    let lines = input::spawn_stdin_reader(shutdown.clone());
    info!("Connected. Type a message and press Enter; Ctrl+C to exit.");
    let outcome = run_chat_loop(&mut socket, &lines, &shutdown);

    // Best effort: the server may already be gone.
    let _ = socket.close(None);
    let _ = socket.flush();
    outcome
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
