//! Error types for oemhook
//!
//! Provides a unified error type for all operations. Failures reported by
//! the modem itself are not errors here: they travel inside
//! [`Response::failure`](crate::protocol::Response) and end up in the report.

use thiserror::Error;

use crate::catalog::{Operation, ParamKind};

/// Result type alias using HookError
pub type Result<T> = std::result::Result<T, HookError>;

/// Unified error type for oemhook operations
#[derive(Debug, Error)]
pub enum HookError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Catalog error: {0}")]
    Catalog(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Frame error: {0}")]
    Frame(String),

    #[error("No pending request for tag {0}")]
    UnknownTag(u64),

    #[error("Timed out after {0} ms waiting for a reply")]
    Timeout(u64),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Parameter shape mismatch between a request and its catalog row.
///
/// These are caller bugs: the encoder refuses the request instead of padding
/// or coercing anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("{0} has no catalog entry")]
    UnknownOperation(Operation),

    #[error("{operation} takes {expected} parameter(s), got {got}")]
    ParamCount {
        operation: Operation,
        expected: usize,
        got: usize,
    },

    #[error("{operation} parameter #{index} ({name}) must be {expected}, got {got}")]
    ParamType {
        operation: Operation,
        index: usize,
        name: &'static str,
        expected: ParamKind,
        got: ParamKind,
    },

    #[error("{operation} layout cannot carry its parameters: {detail}")]
    Layout {
        operation: Operation,
        detail: String,
    },
}
