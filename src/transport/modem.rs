//! Simulated modem
//!
//! A worker thread standing in for the modem side of the OEM hook channel.
//! Requests reach it as frames over a bounded crossbeam channel; replies and
//! indications go straight back on the caller's event channel.
//!
//! ## Default Dispatch
//! - raw request with no bytes → `GENERIC_FAILURE`
//! - code with a registered handler → whatever the handler returns
//! - code known to the catalog → success (raw: no data, strings: tokens echoed)
//! - anything else → `REQUEST_NOT_SUPPORTED`

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::catalog;
use crate::config::Config;
use crate::error::{HookError, Result};
use crate::protocol::{raw_command_code, Command, CompletionTag, ReplyKind, Response};

use super::link::{decode_frame, encode_frame, Frame};
use super::{Completion, Event, Transport};

/// Failure text for malformed requests
pub const GENERIC_FAILURE: &str = "GENERIC_FAILURE";

/// Failure text for codes the modem does not implement
pub const REQUEST_NOT_SUPPORTED: &str = "REQUEST_NOT_SUPPORTED";

/// Scripted reply for one command code
pub type Handler = Arc<dyn Fn(&Command) -> Response + Send + Sync>;

type HandlerTable = Arc<Mutex<HashMap<(ReplyKind, i32), Handler>>>;

/// A modem emulated on a background thread
pub struct SimulatedModem {
    /// Framed link to the worker
    link: Sender<Vec<u8>>,

    /// Handlers registered per (reply kind, code)
    handlers: HandlerTable,

    /// Worker thread, taken on shutdown
    worker: Option<JoinHandle<()>>,

    /// Next frame sequence number
    next_seq: u64,
}

impl SimulatedModem {
    /// Start the worker; completions are delivered on `events`
    pub fn spawn(config: &Config, events: Sender<Event>) -> Result<Self> {
        let (link, frames) = channel::bounded(config.link_capacity);
        let handlers: HandlerTable = Arc::new(Mutex::new(HashMap::new()));

        let worker_handlers = Arc::clone(&handlers);
        let worker = thread::Builder::new()
            .name("oemhook-modem".to_string())
            .spawn(move || run_worker(frames, events, worker_handlers))?;

        tracing::debug!("Simulated modem started");

        Ok(Self {
            link,
            handlers,
            worker: Some(worker),
            next_seq: 0,
        })
    }

    /// Script the reply to raw requests carrying `code`
    pub fn on_raw<F>(&self, code: i32, handler: F)
    where
        F: Fn(&Command) -> Response + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .insert((ReplyKind::Raw, code), Arc::new(handler));
    }

    /// Script the reply to string requests carrying `code`
    pub fn on_strings<F>(&self, code: i32, handler: F)
    where
        F: Fn(&Command) -> Response + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .insert((ReplyKind::Strings, code), Arc::new(handler));
    }

    /// Have the modem push an unsolicited raw indication
    pub fn inject_indication(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.send_frame(&Frame::Indication(bytes))
    }

    /// Stop the worker and wait for it to exit
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        if let Err(e) = self.send_frame(&Frame::Shutdown) {
            tracing::warn!("Could not signal modem shutdown: {}", e);
        }
        if worker.join().is_err() {
            tracing::error!("Simulated modem worker panicked");
        }

        tracing::debug!("Simulated modem stopped");
    }

    fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let bytes = encode_frame(seq, frame)?;
        tracing::trace!("Link frame {}: {} bytes", seq, bytes.len());

        self.link
            .send(bytes)
            .map_err(|_| HookError::Transport("modem link closed".to_string()))
    }
}

impl Transport for SimulatedModem {
    fn submit(&mut self, command: Command, tag: CompletionTag) -> Result<()> {
        if self.worker.is_none() {
            return Err(HookError::Transport("modem is shut down".to_string()));
        }
        self.send_frame(&Frame::Request { tag, command })
    }
}

impl Drop for SimulatedModem {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Worker
// =============================================================================

fn run_worker(frames: Receiver<Vec<u8>>, events: Sender<Event>, handlers: HandlerTable) {
    for bytes in frames.iter() {
        let frame = match decode_frame(&bytes) {
            Ok((_, frame)) => frame,
            Err(e) => {
                tracing::error!("Dropping link frame: {}", e);
                continue;
            }
        };

        let event = match frame {
            Frame::Request { tag, command } => {
                let response = dispatch(&handlers, &command);
                tracing::debug!("Modem answered tag {}: {:?}", tag.id, response);
                Event::Completed(Completion { tag, response })
            }
            Frame::Indication(bytes) => Event::Indication(bytes),
            Frame::Shutdown => break,
        };

        if events.send(event).is_err() {
            tracing::warn!("Event receiver dropped, stopping modem");
            break;
        }
    }
}

fn dispatch(handlers: &HandlerTable, command: &Command) -> Response {
    let (reply, code) = match command {
        Command::Raw(bytes) => match raw_command_code(bytes) {
            Some(code) => (ReplyKind::Raw, code),
            None => return Response::failed(GENERIC_FAILURE),
        },
        Command::Strings(tokens) => match tokens.first().and_then(|t| t.parse::<i32>().ok()) {
            Some(code) => (ReplyKind::Strings, code),
            None => return Response::failed(GENERIC_FAILURE),
        },
    };

    // Clone out so a handler can register other handlers.
    let handler = handlers.lock().get(&(reply, code)).cloned();
    if let Some(handler) = handler {
        return handler(command);
    }

    match command {
        Command::Raw(_) if catalog::find_binary(code).is_some() => Response::null(),
        Command::Strings(tokens) if catalog::find_strings(code).is_some() => {
            Response::strings(tokens.clone())
        }
        _ => {
            tracing::warn!("Modem received unknown command code 0x{:02x}", code);
            Response::failed(REQUEST_NOT_SUPPORTED)
        }
    }
}
