//! Scripted transport for deterministic tests.
//!
//! Expectations are consumed in order. Each `submit()` records the command,
//! checks it against the next expectation and immediately delivers the
//! scripted response. A command that does not match, or arrives after the
//! script is exhausted, completes with a failure instead.

use std::collections::VecDeque;

use crossbeam::channel::Sender;

use crate::error::{HookError, Result};
use crate::protocol::{Command, CompletionTag, Response};

use super::{Completion, Event, Transport};

/// A pre-loaded command/response pair
#[derive(Debug, Clone)]
struct Expectation {
    command: Command,
    response: Response,
}

/// A [`Transport`] that answers from a script
#[derive(Debug)]
pub struct MockTransport {
    /// Ordered queue of expected command/response pairs
    expectations: VecDeque<Expectation>,
    /// Where completions are delivered
    events: Sender<Event>,
    /// Every submission, in order
    sent_log: Vec<(Command, CompletionTag)>,
}

impl MockTransport {
    pub fn new(events: Sender<Event>) -> Self {
        Self {
            expectations: VecDeque::new(),
            events,
            sent_log: Vec::new(),
        }
    }

    /// Answer `command` with `response` when it is next submitted
    pub fn expect(&mut self, command: Command, response: Response) {
        self.expectations.push_back(Expectation { command, response });
    }

    /// Deliver an unsolicited indication right away
    pub fn indicate(&self, bytes: Vec<u8>) -> Result<()> {
        self.deliver(Event::Indication(bytes))
    }

    /// Everything submitted so far
    pub fn sent(&self) -> &[(Command, CompletionTag)] {
        &self.sent_log
    }

    /// Expectations not yet consumed
    pub fn remaining(&self) -> usize {
        self.expectations.len()
    }

    fn deliver(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| HookError::Transport("event receiver dropped".to_string()))
    }
}

impl Transport for MockTransport {
    fn submit(&mut self, command: Command, tag: CompletionTag) -> Result<()> {
        self.sent_log.push((command.clone(), tag));

        let response = match self.expectations.pop_front() {
            Some(expected) if expected.command == command => expected.response,
            Some(expected) => {
                tracing::warn!(
                    "Mock transport expected {} but got {}",
                    expected.command,
                    command
                );
                Response::failed(format!("unexpected command {}", command))
            }
            None => Response::failed(format!("unexpected command {}", command)),
        };

        self.deliver(Event::Completed(Completion { tag, response }))
    }
}
