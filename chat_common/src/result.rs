//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `ChatError`, so functions can simply return `Result<T>`.
use crate::error::ChatError;

/// Workspace-wide `Result` alias with `ChatError` as the default error.
pub type Result<T, E = ChatError> = std::result::Result<T, E>;
