//! Command definitions
//!
//! Requests handed to a modem transport, and the values that fill them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ParamKind;

/// Which kind of completion a submitted command expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplyKind {
    /// Raw OEM hook request; reply is a byte array
    Raw,

    /// OEM hook strings request; reply is a string array
    Strings,
}

/// Correlates a submission with its eventual completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionTag {
    pub id: u64,
    pub reply: ReplyKind,
}

/// A typed parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue {
    Int(i32),
    Bool(bool),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Bool(_) => ParamKind::Bool,
        }
    }

    /// Value as it is written into a 4-byte word
    pub fn as_word(&self) -> i32 {
        match *self {
            ParamValue::Int(value) => value,
            ParamValue::Bool(value) => value as i32,
        }
    }

    /// Parse command-line text as the given kind
    ///
    /// Integers accept decimal or `0x` hex; booleans accept
    /// `true`/`false`/`1`/`0`.
    pub fn parse(kind: ParamKind, text: &str) -> Option<Self> {
        match kind {
            ParamKind::Int => {
                let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    Some(hex) => i32::from_str_radix(hex, 16).ok()?,
                    None => text.parse().ok()?,
                };
                Some(ParamValue::Int(value))
            }
            ParamKind::Bool => match text {
                "true" | "1" => Some(ParamValue::Bool(true)),
                "false" | "0" => Some(ParamValue::Bool(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// An encoded request, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Fixed-layout binary buffer
    Raw(Vec<u8>),

    /// Positional string tokens, decimal code first
    Strings(Vec<String>),
}

impl Command {
    /// The completion kind this command expects
    pub fn reply_kind(&self) -> ReplyKind {
        match self {
            Command::Raw(_) => ReplyKind::Raw,
            Command::Strings(_) => ReplyKind::Strings,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Command::Raw(bytes) => Some(bytes),
            Command::Strings(_) => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Command::Raw(_) => None,
            Command::Strings(tokens) => Some(tokens),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Raw(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
                write!(f, "[{}]", hex.join(" "))
            }
            Command::Strings(tokens) => write!(f, "{:?}", tokens),
        }
    }
}
