#![allow(clippy::unwrap_used, clippy::expect_used)]

use insuretrack_core::errors::{ExError, ExErrorKind, TrackerError};
use insuretrack_core::logging_facility::{command_span, init_test_capture};
use insuretrack_core::{log_op_end, log_op_error, log_op_start};
use insuretrack_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_REQUEST_ID, FIELD_TRACE_ID,
};
use insuretrack_core_types::RequestContext;

#[test]
fn test_log_op_start_records_extra_fields() {
    let capture = init_test_capture();
    let op_name = "logging_test_start_1";

    log_op_start!(op_name, claim_id = 7);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("claim_id"), Some("7"));
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "logging_test_end_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code_from_domain_error() {
    let capture = init_test_capture();
    let op_name = "logging_test_error_3";

    let err = TrackerError::ClaimNotFound { claim_id: 3 };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(event.level, tracing::Level::ERROR);
    assert_eq!(event.field("err_code"), Some("ERR_NOT_FOUND"));
    assert_eq!(event.field("err_kind"), Some("NotFound"));
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "logging_test_error_4";

    let err = ExError::new(ExErrorKind::Io).with_message("disk full");
    log_op_error!(op_name, err, duration_ms = 1);

    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].field("err_code"), Some("ERR_IO"));
    assert_eq!(events[0].field("message"), Some("disk full"));
}

#[test]
fn test_start_end_pair_in_order() {
    let capture = init_test_capture();
    let op_name = "logging_test_pair_5";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 0);

    let kinds: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter_map(|e| e.event)
        .collect();
    assert_eq!(kinds, vec![EVENT_START.to_string(), EVENT_END.to_string()]);
}

#[test]
fn test_command_span_tags_events_with_correlation_ids() {
    let capture = init_test_capture();
    let op_name = "logging_test_span_7";
    let request = RequestContext::new();

    {
        let span = command_span(&request);
        let _entered = span.enter();
        log_op_start!(op_name);
    }
    log_op_end!(op_name, duration_ms = 1);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0].field(FIELD_REQUEST_ID),
        Some(request.request_id.as_str())
    );
    assert_eq!(events[0].field(FIELD_TRACE_ID), Some(request.trace_id.as_str()));
    assert!(events[1].field(FIELD_REQUEST_ID).is_none());
}
