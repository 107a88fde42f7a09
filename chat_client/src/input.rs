//! Reading chat lines from the terminal.
//!
//! Stdin blocks, so it is read on its own thread and handed to the network loop through
//! a channel.
use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error};
use std::io::{self, BufRead};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

/// Spawn the stdin reader and return the channel its non-empty lines arrive on.
///
/// The thread ends at end of input, on a read error, or once `shutdown` is set and the
/// next line arrives.
pub fn spawn_stdin_reader(shutdown: Arc<AtomicBool>) -> Receiver<String> {
    let (tx, rx) = unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        debug!("Stdin reader stopping...");
    });
    rx
}
