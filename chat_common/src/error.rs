//! Error types shared between client and server.
//!
//! The `ChatError` enum unifies common failure cases for I/O, serialization,
//! WebSocket transport, upstream rate fetches and internal coordination, allowing
//! crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum ChatError {
    /// I/O error originating from the standard library, sockets or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// WebSocket protocol or transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// The WebSocket opening handshake with a peer did not complete.
    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    /// A single upstream rate request failed: network, status or payload.
    #[error("Fetch for {date} failed: {reason}")]
    Fetch {
        /// Calendar date the request was issued for.
        date: NaiveDate,
        /// Short description of what went wrong.
        reason: String,
    },

    /// The offload pool could not run a job or lost its result.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for ChatError {
    fn from(err: PoisonError<T>) -> Self {
        ChatError::MutexLock(err.to_string())
    }
}

impl ChatError {
    /// Build a [`ChatError::Fetch`] for `date` from any displayable cause.
    pub fn fetch(date: NaiveDate, reason: impl ToString) -> Self {
        ChatError::Fetch {
            date,
            reason: reason.to_string(),
        }
    }
}
