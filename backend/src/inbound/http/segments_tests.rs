//! Tests for segment administration handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockSegmentCommand;
use crate::inbound::http::configure_api;

async fn call(
    command: MockSegmentCommand,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let state = HttpState {
        segments: Arc::new(command),
        ..HttpState::default()
    };
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_api),
    )
    .await;
    let res = actix_test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body: Value = actix_test::read_body_json(res).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn create_returns_done() {
    let mut command = MockSegmentCommand::new();
    command
        .expect_create_segment()
        .withf(|slug| slug == "AVITO_VOICE_MESSAGES")
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = call(
        command,
        actix_test::TestRequest::post()
            .uri("/api/segments")
            .set_json(json!({"slug": "AVITO_VOICE_MESSAGES"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"done": true}, "error": null}));
}

#[rstest]
#[case(Error::conflict("segment already exists"), StatusCode::CONFLICT)]
#[case(Error::invalid_request("slug cannot be empty"), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn create_failures_report_not_done(#[case] failure: Error, #[case] expected: StatusCode) {
    let message = failure.message().to_owned();
    let mut command = MockSegmentCommand::new();
    command
        .expect_create_segment()
        .times(1)
        .return_once(move |_| Err(failure));

    let (status, body) = call(
        command,
        actix_test::TestRequest::post()
            .uri("/api/segments")
            .set_json(json!({"slug": "x"})),
    )
    .await;

    assert_eq!(status, expected);
    assert_eq!(body, json!({"data": {"done": false}, "error": message}));
}

#[rstest]
#[actix_web::test]
async fn delete_missing_segment_is_not_found() {
    let mut command = MockSegmentCommand::new();
    command
        .expect_delete_segment()
        .times(1)
        .return_once(|_| Err(Error::not_found("segment not found")));

    let (status, body) = call(
        command,
        actix_test::TestRequest::delete()
            .uri("/api/segments")
            .set_json(json!({"slug": "ghost"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("segment not found"));
}

#[rstest]
#[case(json!({"name": "missing slug field"}))]
#[case(json!({"slug": 42}))]
#[actix_web::test]
async fn malformed_body_is_invalid_request(#[case] payload: Value) {
    let mut command = MockSegmentCommand::new();
    command.expect_create_segment().times(0);

    let (status, body) = call(
        command,
        actix_test::TestRequest::post()
            .uri("/api/segments")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"data": null, "error": "invalid request"}));
}

#[rstest]
#[actix_web::test]
async fn internal_failure_is_redacted() {
    let mut command = MockSegmentCommand::new();
    command
        .expect_delete_segment()
        .times(1)
        .return_once(|_| Err(Error::internal("segment repository error: database error")));

    let (status, body) = call(
        command,
        actix_test::TestRequest::delete()
            .uri("/api/segments")
            .set_json(json!({"slug": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"data": null, "error": "internal error"}));
}
