//! Response definitions
//!
//! Results delivered by a modem transport once a command completes.

use serde::{Deserialize, Serialize};

use super::ReplyKind;

/// The data part of a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Bytes(Vec<u8>),
    Strings(Vec<String>),
}

impl Payload {
    pub fn reply_kind(&self) -> ReplyKind {
        match self {
            Payload::Bytes(_) => ReplyKind::Raw,
            Payload::Strings(_) => ReplyKind::Strings,
        }
    }

    /// Number of elements (bytes or strings)
    pub fn len(&self) -> usize {
        match self {
            Payload::Bytes(bytes) => bytes.len(),
            Payload::Strings(strings) => strings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A completed request
///
/// `failure` and `result` are independent: a modem may report an error and
/// still hand back data, and both are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Error description reported by the transport or modem
    pub failure: Option<String>,

    /// Returned data, absent when the modem sent nothing
    pub result: Option<Payload>,
}

impl Response {
    /// Success carrying a byte array
    pub fn bytes(bytes: Vec<u8>) -> Self {
        Self {
            failure: None,
            result: Some(Payload::Bytes(bytes)),
        }
    }

    /// Success carrying a string array
    pub fn strings(strings: Vec<String>) -> Self {
        Self {
            failure: None,
            result: Some(Payload::Strings(strings)),
        }
    }

    /// Success with no data
    pub fn null() -> Self {
        Self::default()
    }

    /// Failure with no data
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            result: None,
        }
    }

    /// Attach a failure description, keeping any result
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}
