//! Tests for the history export handler.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockHistoryQuery;
use crate::domain::{Operation, OperationKind, Segment, UserId};
use crate::inbound::http::configure_api;

fn state_with(query: MockHistoryQuery) -> HttpState {
    HttpState {
        history: Arc::new(query),
        ..HttpState::default()
    }
}

fn sample_report() -> HistoryReport {
    let at = Utc
        .with_ymd_and_hms(2023, 8, 2, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    HistoryReport::from_operations(&[
        Operation::new(
            UserId::new(0),
            Segment::new("slug-0").expect("valid"),
            OperationKind::Add,
            at,
        ),
        Operation::new(
            UserId::new(1),
            Segment::new("slug, with comma").expect("valid"),
            OperationKind::Remove,
            at,
        ),
    ])
}

#[rstest]
fn csv_quotes_fields_that_need_it() {
    let bytes = render_csv(&sample_report()).expect("render csv");
    let text = String::from_utf8(bytes).expect("utf8 csv");

    assert_eq!(
        text,
        "User ID,Segment,Operation,Timestamp UTC\n\
         0,slug-0,add,2023-08-02T10:00:00.000000Z\n\
         1,\"slug, with comma\",remove,2023-08-02T10:00:00.000000Z\n"
    );
}

#[rstest]
#[actix_web::test]
async fn serves_csv_attachment() {
    let mut query = MockHistoryQuery::new();
    query
        .expect_history()
        .withf(|year, month| *year == 2023 && *month == 8)
        .times(1)
        .return_once(|_, _| Ok(sample_report()));
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(query)))
            .configure(configure_api),
    )
    .await;

    let req = actix_test::TestRequest::get()
        .uri("/api/history/2023/8")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let header = |name: actix_web::http::header::HeaderName| {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    assert_eq!(header(CONTENT_TYPE).as_deref(), Some("text/csv"));
    assert_eq!(
        header(CONTENT_DISPOSITION).as_deref(),
        Some("attachment;filename=history.csv")
    );
    let body = actix_test::read_body(res).await;
    let text = std::str::from_utf8(&body).expect("utf8 csv");
    assert_eq!(text.lines().count(), 3);
}

#[rstest]
#[actix_web::test]
async fn invalid_dates_are_bad_request() {
    let mut query = MockHistoryQuery::new();
    query
        .expect_history()
        .times(1)
        .return_once(|_, _| Err(Error::invalid_request("invalid dates")));
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(query)))
            .configure(configure_api),
    )
    .await;

    let req = actix_test::TestRequest::get()
        .uri("/api/history/2023/13")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"data": null, "error": "invalid dates"}));
}

#[rstest]
#[actix_web::test]
async fn non_numeric_dates_are_invalid_request() {
    let mut query = MockHistoryQuery::new();
    query.expect_history().times(0);
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(query)))
            .configure(configure_api),
    )
    .await;

    let req = actix_test::TestRequest::get()
        .uri("/api/history/twenty/8")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], json!("invalid request"));
}
