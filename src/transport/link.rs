//! Link framing
//!
//! Messages crossing the simulated modem link are framed like this:
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────────┐
//! │ Seq (8)  │ CRC (4)  │ Len (4)  │ bincode payload  │
//! └──────────┴──────────┴──────────┴──────────────────┘
//! ```
//! All header fields are little-endian. The CRC covers the payload only.

use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{HookError, Result};
use crate::protocol::{Command, CompletionTag};

/// Header size: seq (8) + crc (4) + len (4)
pub const FRAME_HEADER_SIZE: usize = 16;

/// Maximum payload size (1 MB)
pub const MAX_FRAME_PAYLOAD: u32 = 1024 * 1024;

/// A message sent to the modem side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    /// Execute a command and reply with the given tag
    Request { tag: CompletionTag, command: Command },

    /// Push an unsolicited indication back to the host
    Indication(Vec<u8>),

    /// Stop the modem worker
    Shutdown,
}

/// Encode a frame
pub fn encode_frame(seq: u64, frame: &Frame) -> Result<Vec<u8>> {
    let payload = bincode::serialize(frame).map_err(|e| HookError::Frame(e.to_string()))?;
    if payload.len() > MAX_FRAME_PAYLOAD as usize {
        return Err(HookError::Frame(format!(
            "Payload too large: {} bytes (max {})",
            payload.len(),
            MAX_FRAME_PAYLOAD
        )));
    }

    let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload.len());
    buf.put_u64_le(seq);
    buf.put_u32_le(crc32fast::hash(&payload));
    buf.put_u32_le(payload.len() as u32);
    buf.put_slice(&payload);

    Ok(buf.to_vec())
}

/// Decode a frame, returning its sequence number
pub fn decode_frame(bytes: &[u8]) -> Result<(u64, Frame)> {
    if bytes.len() < FRAME_HEADER_SIZE {
        return Err(HookError::Frame(format!(
            "Incomplete header: expected {} bytes, got {}",
            FRAME_HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..FRAME_HEADER_SIZE];
    let seq = header.get_u64_le();
    let crc = header.get_u32_le();
    let len = header.get_u32_le();

    if len > MAX_FRAME_PAYLOAD {
        return Err(HookError::Frame(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_FRAME_PAYLOAD
        )));
    }

    let total_len = FRAME_HEADER_SIZE + len as usize;
    if bytes.len() != total_len {
        return Err(HookError::Frame(format!(
            "Frame length mismatch: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let payload = &bytes[FRAME_HEADER_SIZE..];
    let actual = crc32fast::hash(payload);
    if actual != crc {
        return Err(HookError::Frame(format!(
            "Checksum mismatch on frame {}: header 0x{:08x}, payload 0x{:08x}",
            seq, crc, actual
        )));
    }

    let frame = bincode::deserialize(payload).map_err(|e| HookError::Frame(e.to_string()))?;
    Ok((seq, frame))
}
