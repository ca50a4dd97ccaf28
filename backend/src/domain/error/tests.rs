//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::rate_limited("x"), ErrorCode::RateLimited)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[tokio::test]
async fn constructors_capture_the_ambient_trace_id() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("serialise");
    assert_eq!(value, json!({"code": "invalid_request", "message": "bad"}));

    let with_extras = base_error
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "name"}));
    let value = serde_json::to_value(&with_extras).expect("serialise");
    assert_eq!(value.get("traceId"), Some(&json!(TRACE_ID)));
    assert_eq!(value.get("details"), Some(&json!({"field": "name"})));
}

#[tokio::test]
async fn decoding_ignores_the_ambient_trace_id() {
    let ambient: TraceId = "11111111-1111-1111-1111-111111111111"
        .parse()
        .expect("valid UUID");
    let decoded: Error = TraceId::scope(ambient, async {
        serde_json::from_value(json!({"code": "not_found", "message": "gone"}))
            .expect("decode error payload")
    })
    .await;
    assert_eq!(decoded.trace_id(), None);
    assert_eq!(decoded.code(), ErrorCode::NotFound);
}

#[rstest]
fn decoding_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({"code": "conflict", "message": " "}));
    assert!(result.is_err());
}
