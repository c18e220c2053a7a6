//! Session Module
//!
//! Ties the codec to a transport.
//!
//! ## Responsibilities
//! - Encode a selected operation and submit it with a fresh tag
//! - Remember which operation and reply kind each tag belongs to
//! - Route each completion to the formatter
//! - Render unsolicited indications
//!
//! Encoding and formatting stay synchronous. The only state shared between
//! submission and completion is the pending-tag table.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;

use crate::catalog::Operation;
use crate::config::Config;
use crate::error::{EncodingError, HookError, Result};
use crate::protocol::{
    encode_spec, format_indication, format_response, CompletionTag, ParamValue, ReplyKind,
};
use crate::transport::{Completion, Event, Transport};

/// Rendered outcome of one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Tag of the request this answers, `None` for indications
    pub tag: Option<CompletionTag>,

    /// Operation that was submitted, `None` for indications
    pub operation: Option<Operation>,

    /// Text for display
    pub text: String,
}

impl Report {
    pub fn is_indication(&self) -> bool {
        self.tag.is_none()
    }
}

/// What the session remembers about an in-flight request
#[derive(Debug, Clone, Copy)]
struct Pending {
    operation: Operation,
    reply: ReplyKind,
}

/// Client side of the OEM hook channel
pub struct Session<T: Transport> {
    config: Config,
    transport: T,
    events: Receiver<Event>,
    pending: Mutex<HashMap<u64, Pending>>,
    // Reports that arrived during `run` but belong to someone else
    backlog: Mutex<VecDeque<Report>>,
    next_id: AtomicU64,
}

impl<T: Transport> Session<T> {
    /// Create a session over `transport`, reading its events from `events`
    pub fn new(config: Config, transport: T, events: Receiver<Event>) -> Self {
        Self {
            config,
            transport,
            events,
            pending: Mutex::new(HashMap::new()),
            backlog: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Encode and submit `operation`
    ///
    /// Returns the tag the completion will carry. Nothing is registered when
    /// encoding fails.
    pub fn submit(&mut self, operation: Operation, params: &[ParamValue]) -> Result<CompletionTag> {
        let spec = operation
            .spec()
            .ok_or(EncodingError::UnknownOperation(operation))?;
        let command = encode_spec(spec, params)?;

        let tag = CompletionTag {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            reply: spec.reply_kind(),
        };

        self.pending.lock().insert(
            tag.id,
            Pending {
                operation,
                reply: tag.reply,
            },
        );

        if let Err(e) = self.transport.submit(command, tag) {
            self.pending.lock().remove(&tag.id);
            return Err(e);
        }

        tracing::debug!("Submitted {} as tag {}", operation, tag.id);
        Ok(tag)
    }

    /// Match a completion to its request and render it
    pub fn complete(&self, completion: Completion) -> Result<Report> {
        let Completion { tag, response } = completion;

        let pending = self
            .pending
            .lock()
            .remove(&tag.id)
            .ok_or(HookError::UnknownTag(tag.id))?;

        if let Some(result) = &response.result {
            if result.reply_kind() != pending.reply {
                tracing::warn!(
                    "Tag {} ({}) expected a {:?} reply but received {:?} data",
                    tag.id,
                    pending.operation,
                    pending.reply,
                    result.reply_kind()
                );
            }
        }
        if let Some(failure) = &response.failure {
            tracing::info!("Tag {} ({}) failed: {}", tag.id, pending.operation, failure);
        }

        Ok(Report {
            tag: Some(tag),
            operation: Some(pending.operation),
            text: format_response(&response),
        })
    }

    /// Render any transport event
    pub fn handle_event(&self, event: Event) -> Result<Report> {
        match event {
            Event::Completed(completion) => self.complete(completion),
            Event::Indication(bytes) => {
                tracing::debug!("Unsolicited indication: {} bytes", bytes.len());
                Ok(Report {
                    tag: None,
                    operation: None,
                    text: format_indication(&bytes),
                })
            }
        }
    }

    /// Block until the next event arrives and render it
    ///
    /// Reports held back by [`run`](Self::run) are returned first, oldest
    /// first.
    pub fn wait_report(&self) -> Result<Report> {
        if let Some(report) = self.backlog.lock().pop_front() {
            return Ok(report);
        }
        let event = self.recv_event(Duration::from_millis(self.config.reply_timeout_ms))?;
        self.handle_event(event)
    }

    /// Submit `operation` and wait for its own completion
    ///
    /// Completions for other tags and indications that arrive in the meantime
    /// are kept for later [`wait_report`](Self::wait_report) calls. On any
    /// error, including a timeout, the request is no longer pending and a late
    /// completion for it is reported as [`HookError::UnknownTag`].
    pub fn run(&mut self, operation: Operation, params: &[ParamValue]) -> Result<Report> {
        let tag = self.submit(operation, params)?;
        let result = self.wait_for(tag);
        if result.is_err() && self.pending.lock().remove(&tag.id).is_some() {
            tracing::warn!("Abandoned tag {} ({})", tag.id, operation);
        }
        result
    }

    fn wait_for(&self, tag: CompletionTag) -> Result<Report> {
        let deadline = Instant::now() + Duration::from_millis(self.config.reply_timeout_ms);
        loop {
            let event = self.recv_event(deadline.saturating_duration_since(Instant::now()))?;
            let report = match self.handle_event(event) {
                Ok(report) => report,
                Err(HookError::UnknownTag(id)) => {
                    tracing::warn!("Dropping completion for unknown tag {}", id);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if report.tag == Some(tag) {
                return Ok(report);
            }
            tracing::debug!("Holding back event while waiting for tag {}", tag.id);
            self.backlog.lock().push_back(report);
        }
    }

    fn recv_event(&self, timeout: Duration) -> Result<Event> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(event),
            Err(RecvTimeoutError::Timeout) => Err(HookError::Timeout(self.config.reply_timeout_ms)),
            Err(RecvTimeoutError::Disconnected) => {
                Err(HookError::Transport("event channel closed".to_string()))
            }
        }
    }

    /// Number of requests still waiting for a completion
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
