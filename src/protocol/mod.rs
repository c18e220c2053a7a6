//! Protocol Module
//!
//! Request encoding and response rendering for OEM hook commands.
//!
//! ## Requests
//! - Raw: fixed-size buffer of little-endian i32 words, command code first
//! - Strings: decimal command code token followed by positional tokens
//!
//! ## Responses
//! A completion carries an optional failure description and an optional
//! byte or string array. Both halves are rendered independently.

mod command;
mod response;
mod codec;
mod report;

pub use command::{Command, CompletionTag, ParamValue, ReplyKind};
pub use response::{Payload, Response};
pub use codec::{decode_words, encode, encode_spec, raw_command_code, WORD_SIZE};
pub use report::{format_indication, format_response, INDICATION_LINE, NULL_RESPONSE_LINE};
