//! Response formatting
//!
//! Renders completions as the plain-text block shown to the operator.
//!
//! ```text
//! Exception:<failure>          (only when a failure was reported)
//!
//! oemResponse length=[N]
//! oemResponse[0]=[0xbb]        (bytes: unsigned lower-case hex)
//! oemResponse[1]=[text]        (strings: the literal value)
//! ```
//! A completion with neither failure nor data renders as the single line
//! `received NULL oem hook response`.
//!
//! Output is not truncated; large responses produce large reports.

use std::fmt::Write;

use super::codec::{decode_words, WORD_SIZE};
use super::{Payload, Response};

/// Line emitted when a completion carries nothing at all
pub const NULL_RESPONSE_LINE: &str = "received NULL oem hook response";

/// Header line for unsolicited indications
pub const INDICATION_LINE: &str = "unsolicited oem hook raw";

/// Render a completion
pub fn format_response(response: &Response) -> String {
    let mut out = String::new();

    if let Some(failure) = &response.failure {
        let _ = writeln!(out, "Exception:{}", failure);
        out.push('\n');
    }

    match &response.result {
        Some(Payload::Bytes(bytes)) => push_bytes(&mut out, bytes),
        Some(Payload::Strings(strings)) => push_strings(&mut out, strings),
        None if response.failure.is_none() => {
            out.push_str(NULL_RESPONSE_LINE);
            out.push('\n');
        }
        None => {}
    }

    out
}

/// Render an unsolicited raw indication
///
/// Indications built from whole words also get their little-endian decoding.
pub fn format_indication(bytes: &[u8]) -> String {
    let mut out = String::new();
    out.push_str(INDICATION_LINE);
    out.push('\n');
    push_bytes(&mut out, bytes);

    if !bytes.is_empty() && bytes.len() % WORD_SIZE == 0 {
        let words: Vec<String> = decode_words(bytes).iter().map(|w| w.to_string()).collect();
        let _ = writeln!(out, "as words=[{}]", words.join(", "));
    }

    out
}

fn push_bytes(out: &mut String, bytes: &[u8]) {
    let _ = writeln!(out, "oemResponse length=[{}]", bytes.len());
    for (index, byte) in bytes.iter().enumerate() {
        let _ = writeln!(out, "oemResponse[{}]=[0x{:x}]", index, byte);
    }
}

fn push_strings(out: &mut String, strings: &[String]) {
    let _ = writeln!(out, "oemResponse length=[{}]", strings.len());
    for (index, value) in strings.iter().enumerate() {
        let _ = writeln!(out, "oemResponse[{}]=[{}]", index, value);
    }
}
