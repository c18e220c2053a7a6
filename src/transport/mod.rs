//! Transport Module
//!
//! The boundary between the codec and whatever actually talks to a modem.
//!
//! ## Architecture
//! - `Transport::submit` hands over an encoded command and its tag
//! - completions and unsolicited indications come back later as [`Event`]s
//!   on a crossbeam channel the caller owns
//!
//! Two implementations ship with the crate:
//! - [`MockTransport`]: scripted request/response pairs for tests
//! - [`SimulatedModem`]: a worker thread behind a framed link that answers
//!   the way modem-side hook dispatch does

mod link;
mod mock;
mod modem;

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::Result;
use crate::protocol::{Command, CompletionTag, Response};

pub use link::{decode_frame, encode_frame, Frame, FRAME_HEADER_SIZE, MAX_FRAME_PAYLOAD};
pub use mock::MockTransport;
pub use modem::{Handler, SimulatedModem, GENERIC_FAILURE, REQUEST_NOT_SUPPORTED};

/// A finished request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub tag: CompletionTag,
    pub response: Response,
}

/// Something the transport delivers asynchronously
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Reply to an earlier submission
    Completed(Completion),

    /// Unsolicited raw OEM hook notification
    Indication(Vec<u8>),
}

/// A modem link that accepts encoded commands
pub trait Transport {
    /// Queue `command`; its completion is later delivered tagged with `tag`
    fn submit(&mut self, command: Command, tag: CompletionTag) -> Result<()>;
}

/// Create the channel transports deliver events on
pub fn event_channel() -> (Sender<Event>, Receiver<Event>) {
    channel::unbounded()
}
