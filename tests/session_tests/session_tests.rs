//! Tests for Session
//!
//! These tests verify:
//! - Submission encodes and tags requests
//! - Completions are matched to their tag and rendered
//! - Unknown tags, encoding errors and timeouts surface as errors
//! - Indications are rendered without a tag

use std::thread;

use oemhook::catalog::{Operation, OperationKind, Revision};
use oemhook::protocol::{Command, CompletionTag, ParamValue, ReplyKind, Response};
use oemhook::transport::{self, Completion, Event, MockTransport, Transport};
use oemhook::{Config, EncodingError, HookError, Session};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_session() -> Session<MockTransport> {
    let config = Config::builder().reply_timeout_ms(200).build().unwrap();
    let (events_tx, events_rx) = transport::event_channel();
    Session::new(config, MockTransport::new(events_tx), events_rx)
}

/// Accepts every command and never answers
struct SilentTransport;

impl Transport for SilentTransport {
    fn submit(&mut self, _command: Command, _tag: CompletionTag) -> oemhook::Result<()> {
        Ok(())
    }
}

fn timer_op() -> Operation {
    Operation::new(OperationKind::SetFastDormancyTimer, Revision::Legacy)
}

fn atr_op() -> Operation {
    Operation::new(OperationKind::GetAtr, Revision::Strings)
}

// =============================================================================
// Submission
// =============================================================================

#[test]
fn test_submit_sends_encoded_command() {
    let mut session = setup_session();
    let tag = session.submit(timer_op(), &[ParamValue::Int(0)]).unwrap();

    assert_eq!(tag.reply, ReplyKind::Raw);
    let sent = session.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Command::Raw(vec![0xCC, 0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(sent[0].1, tag);
    assert_eq!(session.pending_count(), 1);
}

#[test]
fn test_tags_are_unique() {
    let mut session = setup_session();
    let first = session.submit(atr_op(), &[]).unwrap();
    let second = session.submit(atr_op(), &[]).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.reply, ReplyKind::Strings);
}

#[test]
fn test_encoding_error_registers_nothing() {
    let mut session = setup_session();
    let err = session.submit(timer_op(), &[]).unwrap_err();

    assert!(matches!(err, HookError::Encoding(EncodingError::ParamCount { .. })));
    assert_eq!(session.pending_count(), 0);
    assert!(session.transport().sent().is_empty());
}

#[test]
fn test_unknown_operation_is_encoding_error() {
    let mut session = setup_session();
    let operation = Operation::new(OperationKind::PowerOff, Revision::Strings);
    let err = session.submit(operation, &[]).unwrap_err();

    assert!(matches!(
        err,
        HookError::Encoding(EncodingError::UnknownOperation(op)) if op == operation
    ));
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_run_returns_scripted_bytes() {
    let mut session = setup_session();
    session.transport_mut().expect(
        Command::Raw(vec![0xD1]),
        Response::bytes(vec![0x01, 0x00, 0x00, 0x00]),
    );

    let operation = Operation::new(OperationKind::GetActiveSim, Revision::Legacy);
    let report = session.run(operation, &[]).unwrap();

    assert_eq!(report.operation, Some(operation));
    assert!(report.text.contains("oemResponse length=[4]"));
    assert!(report.text.contains("oemResponse[0]=[0x1]"));
    assert_eq!(session.pending_count(), 0);
    assert_eq!(session.transport().remaining(), 0);
}

#[test]
fn test_run_returns_scripted_strings() {
    let mut session = setup_session();
    session.transport_mut().expect(
        Command::Strings(vec!["165".to_string()]),
        Response::strings(vec!["3B9F96801FC78031A073BE21136743200718000001A5".to_string()]),
    );

    let report = session.run(atr_op(), &[]).unwrap();
    assert!(report.text.contains("oemResponse[0]=[3B9F96"));
}

#[test]
fn test_unexpected_command_completes_with_failure() {
    let mut session = setup_session();
    session
        .transport_mut()
        .expect(Command::Raw(vec![0xBB]), Response::null());

    let report = session.run(timer_op(), &[ParamValue::Int(5)]).unwrap();
    assert!(report.text.starts_with("Exception:unexpected command"));
}

#[test]
fn test_complete_unknown_tag() {
    let session = setup_session();
    let completion = Completion {
        tag: CompletionTag { id: 99, reply: ReplyKind::Raw },
        response: Response::null(),
    };

    let err = session.complete(completion).unwrap_err();
    assert!(matches!(err, HookError::UnknownTag(99)));
}

#[test]
fn test_complete_twice_fails_second_time() {
    let mut session = setup_session();
    let tag = session.submit(atr_op(), &[]).unwrap();
    let completion = Completion {
        tag,
        response: Response::strings(vec!["165".to_string()]),
    };

    session.complete(completion.clone()).unwrap();
    assert!(matches!(
        session.complete(completion),
        Err(HookError::UnknownTag(id)) if id == tag.id
    ));
}

#[test]
fn test_misrouted_reply_is_still_rendered() {
    let mut session = setup_session();
    let tag = session.submit(atr_op(), &[]).unwrap();

    let report = session
        .complete(Completion {
            tag,
            response: Response::bytes(vec![0xBB]),
        })
        .unwrap();

    assert!(report.text.contains("oemResponse[0]=[0xbb]"));
}

#[test]
fn test_completion_from_another_thread() {
    let mut session = setup_session();
    let tag = session.submit(atr_op(), &[]).unwrap();

    let report = thread::scope(|scope| {
        scope
            .spawn(|| {
                session.complete(Completion {
                    tag,
                    response: Response::null(),
                })
            })
            .join()
            .unwrap()
    })
    .unwrap();

    assert_eq!(report.tag, Some(tag));
    assert_eq!(report.text, "received NULL oem hook response\n");
}

// =============================================================================
// Events and Timeouts
// =============================================================================

#[test]
fn test_wait_report_times_out() {
    let session = setup_session();
    let err = session.wait_report().unwrap_err();
    assert!(matches!(err, HookError::Timeout(200)));
}

#[test]
fn test_indication_report_has_no_tag() {
    let session = setup_session();
    session
        .transport()
        .indicate(vec![0xAB, 0, 0, 0, 2, 0, 0, 0])
        .unwrap();

    let report = session.wait_report().unwrap();
    assert!(report.is_indication());
    assert!(report.text.starts_with("unsolicited oem hook raw\n"));
    assert!(report.text.contains("as words=[171, 2]"));
}

#[test]
fn test_run_keeps_indications_for_later() {
    let mut session = setup_session();
    session.transport().indicate(vec![0x01]).unwrap();
    session
        .transport_mut()
        .expect(Command::Strings(vec!["165".to_string()]), Response::null());

    let report = session.run(atr_op(), &[]).unwrap();
    assert!(!report.is_indication());

    let held = session.wait_report().unwrap();
    assert!(held.is_indication());
    assert!(held.text.contains("oemResponse[0]=[0x1]"));
}

#[test]
fn test_run_keeps_other_completions_for_later() {
    let mut session = setup_session();
    session
        .transport_mut()
        .expect(Command::Raw(vec![0xBB]), Response::bytes(vec![0x07]));
    session
        .transport_mut()
        .expect(Command::Strings(vec!["165".to_string()]), Response::null());

    let fast_dormancy = Operation::new(OperationKind::TriggerFastDormancy, Revision::Legacy);
    let earlier = session.submit(fast_dormancy, &[]).unwrap();

    let report = session.run(atr_op(), &[]).unwrap();
    assert_eq!(report.operation, Some(atr_op()));

    let held = session.wait_report().unwrap();
    assert_eq!(held.tag, Some(earlier));
    assert!(held.text.contains("oemResponse[0]=[0x7]"));
    assert_eq!(session.pending_count(), 0);
}

#[test]
fn test_run_timeout_releases_pending_tag() {
    let config = Config::builder().reply_timeout_ms(20).build().unwrap();
    let (_events_tx, events_rx) = transport::event_channel();
    let mut session = Session::new(config, SilentTransport, events_rx);

    for _ in 0..3 {
        let err = session.run(atr_op(), &[]).unwrap_err();
        assert!(matches!(err, HookError::Timeout(20)));
    }
    assert_eq!(session.pending_count(), 0);
}

#[test]
fn test_handle_event_completed() {
    let mut session = setup_session();
    let tag = session.submit(atr_op(), &[]).unwrap();

    let report = session
        .handle_event(Event::Completed(Completion {
            tag,
            response: Response::failed("timeout"),
        }))
        .unwrap();

    assert_eq!(report.text, "Exception:timeout\n\n");
}
