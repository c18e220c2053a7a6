//! Protocol codec
//!
//! Builds OEM hook request payloads from catalog rows.
//!
//! ## Binary Format
//! ```text
//! ┌──────────┬──────────┬──────────┬─────┬──────────────┐
//! │ Code (4) │ P0 (4)   │ P1 (4)   │ ... │ zero padding │
//! └──────────┴──────────┴──────────┴─────┴──────────────┘
//! ```
//! Every field is a little-endian i32. Legacy single-byte commands are just
//! the low byte of the code.
//!
//! ### String Format
//! ```text
//! ["<code>", "<token>", ...]
//! ```
//! A token holds one parameter, or several joined by single spaces.

use bytes::{Buf, BufMut, BytesMut};

use crate::catalog::{Layout, Operation, OperationSpec};
use crate::error::EncodingError;

use super::{Command, ParamValue};

/// Size of one command field in bytes
pub const WORD_SIZE: usize = 4;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request for `operation`
///
/// Fails when the operation has no catalog row or when `params` does not
/// match the row's declared parameter list in count and kind.
pub fn encode(operation: Operation, params: &[ParamValue]) -> Result<Command, EncodingError> {
    let spec = operation
        .spec()
        .ok_or(EncodingError::UnknownOperation(operation))?;
    encode_spec(spec, params)
}

/// Encode a request against an explicit catalog row
pub fn encode_spec(spec: &OperationSpec, params: &[ParamValue]) -> Result<Command, EncodingError> {
    check_params(spec, params)?;

    let layout_error = |detail: String| EncodingError::Layout {
        operation: spec.operation,
        detail,
    };

    let command = match spec.layout {
        Layout::Binary { size } => encode_binary(spec.code, size, params)
            .map(Command::Raw)
            .ok_or_else(|| {
                layout_error(format!(
                    "{} bytes cannot hold {} parameter word(s)",
                    size,
                    params.len()
                ))
            })?,
        Layout::Tokens(tokens) => encode_tokens(spec.code, tokens, params)
            .map(Command::Strings)
            .ok_or_else(|| layout_error("token refers to a missing parameter".to_string()))?,
    };

    tracing::debug!("Encoded {}: {}", spec.operation, command);
    Ok(command)
}

fn check_params(spec: &OperationSpec, params: &[ParamValue]) -> Result<(), EncodingError> {
    if params.len() != spec.params.len() {
        return Err(EncodingError::ParamCount {
            operation: spec.operation,
            expected: spec.params.len(),
            got: params.len(),
        });
    }

    for (index, (declared, value)) in spec.params.iter().zip(params).enumerate() {
        if declared.kind != value.kind() {
            return Err(EncodingError::ParamType {
                operation: spec.operation,
                index,
                name: declared.name,
                expected: declared.kind,
                got: value.kind(),
            });
        }
    }

    Ok(())
}

/// `None` when `size` is too small for the code and every parameter word
fn encode_binary(code: i32, size: usize, params: &[ParamValue]) -> Option<Vec<u8>> {
    if size == 1 && params.is_empty() {
        return Some(vec![code as u8]);
    }
    if size < WORD_SIZE * (1 + params.len()) {
        return None;
    }

    let mut buf = BytesMut::with_capacity(size);
    buf.put_i32_le(code);
    for param in params {
        buf.put_i32_le(param.as_word());
    }
    buf.resize(size, 0);

    Some(buf.to_vec())
}

/// `None` when a token refers to a parameter index that was not supplied
fn encode_tokens(code: i32, tokens: &[&[usize]], params: &[ParamValue]) -> Option<Vec<String>> {
    let mut out = Vec::with_capacity(1 + tokens.len());
    out.push(code.to_string());

    for token in tokens {
        let parts = token
            .iter()
            .map(|&i| params.get(i).map(ToString::to_string))
            .collect::<Option<Vec<String>>>()?;
        out.push(parts.join(" "));
    }

    Some(out)
}

// =============================================================================
// Field Decoding
// =============================================================================

/// Read a buffer as consecutive little-endian i32 words
///
/// Trailing bytes that do not fill a whole word are ignored.
pub fn decode_words(bytes: &[u8]) -> Vec<i32> {
    let mut buf = bytes;
    let mut words = Vec::with_capacity(bytes.len() / WORD_SIZE);
    while buf.remaining() >= WORD_SIZE {
        words.push(buf.get_i32_le());
    }
    words
}

/// Command code carried by a raw request
///
/// Buffers of at least one word carry the code in the first word; shorter
/// ones carry it in the first byte.
pub fn raw_command_code(bytes: &[u8]) -> Option<i32> {
    match bytes.len() {
        0 => None,
        n if n < WORD_SIZE => Some(bytes[0] as i32),
        _ => decode_words(&bytes[..WORD_SIZE]).first().copied(),
    }
}
