//! # oemhook
//!
//! Command/response codec for vendor modem OEM hook requests:
//! - Static catalog of operations across three command set revisions
//! - Fixed-layout little-endian binary and positional string encodings
//! - Plain-text rendering of byte and string replies
//! - Tag-correlated dispatch over a pluggable transport
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Caller (CLI / UI)                          │
//! │               picks Operation + params                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Session                                 │
//! │          encode → submit(tag) … complete(tag) → format       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Catalog   │          │  Transport  │
//!   │  (static)   │          │ (async rx)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │    Modem    │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod catalog;
pub mod protocol;
pub mod transport;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{EncodingError, HookError, Result};
pub use config::Config;
pub use catalog::{Operation, OperationKind, Revision};
pub use protocol::{encode, format_response, Command, ParamValue, Response};
pub use session::{Report, Session};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of oemhook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
