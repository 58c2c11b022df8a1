//! Event submission: single events and batches.

mod common;

use chrono::{TimeZone, Utc};
use common::{event, start_mock_server, test_client};
use honeycomb_api::client::Events;
use honeycomb_api::types::SendBatchRequest;
use honeycomb_api::{Error, ErrorKind};
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn send_single_event() {
    let (base_url, state, _h) = start_mock_server().await;
    let (client, _) = test_client(&base_url);

    client
        .events()
        .send(
            &CancellationToken::new(),
            "ds",
            &event(json!({"column_1": "foo", "duration_ms": 1000})),
        )
        .await
        .unwrap();

    let requests = state.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].raw_path, "/1/events/ds");
    assert_eq!(requests[0].json(), json!({"column_1": "foo", "duration_ms": 1000}));
}

#[tokio::test]
async fn send_batch_returns_one_status_per_event() {
    let (base_url, state, _h) = start_mock_server().await;
    let (client, _) = test_client(&base_url);
    let time = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    let batch = vec![
        SendBatchRequest::new(event(json!({"column_1": "foo", "duration_ms": 1000}))),
        SendBatchRequest::new(event(json!({"column_1": "bar", "duration_ms": 2000})))
            .with_time(time)
            .with_sample_rate(2),
    ];

    let statuses = client
        .events()
        .send_batch(&CancellationToken::new(), "ds", &batch)
        .await
        .unwrap();

    assert_eq!(statuses.len(), batch.len());
    assert!(statuses.iter().all(|s| s.status == 202 && s.is_accepted()));

    let sent = state.requests()[0].json();
    assert_eq!(state.requests()[0].raw_path, "/1/batch/ds");
    assert_eq!(sent[0], json!({"data": {"column_1": "foo", "duration_ms": 1000}}));
    assert_eq!(sent[1]["samplerate"], 2);
    assert_eq!(sent[1]["time"], "2024-05-01T10:00:00Z");
}

#[tokio::test]
async fn short_batch_response_is_reported() {
    let (base_url, state, _h) = start_mock_server().await;
    let (client, _) = test_client(&base_url);
    *state.batch_response.lock().unwrap() = Some(json!([{"status": 202}]));

    let batch = vec![
        SendBatchRequest::new(event(json!({"n": 1}))),
        SendBatchRequest::new(event(json!({"n": 2}))),
        SendBatchRequest::new(event(json!({"n": 3}))),
    ];
    let err = client
        .events()
        .send_batch(&CancellationToken::new(), "ds", &batch)
        .await
        .unwrap_err();

    match err {
        Error::BatchLengthMismatch { sent, received } => {
            assert_eq!(sent, 3);
            assert_eq!(received, 1);
        }
        other => panic!("expected BatchLengthMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn long_batch_response_is_reported() {
    let (base_url, state, _h) = start_mock_server().await;
    let (client, _) = test_client(&base_url);
    *state.batch_response.lock().unwrap() =
        Some(json!([{"status": 202}, {"status": 202}, {"status": 202}]));

    let batch = vec![SendBatchRequest::new(event(json!({"n": 1})))];
    let err = client
        .events()
        .send_batch(&CancellationToken::new(), "ds", &batch)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn per_event_rejections_are_returned_in_position() {
    let (base_url, state, _h) = start_mock_server().await;
    let (client, _) = test_client(&base_url);
    *state.batch_response.lock().unwrap() = Some(json!([
        {"status": 202},
        {"status": 400, "error": "event dropped due to administrative denylist"}
    ]));

    let batch = vec![
        SendBatchRequest::new(event(json!({"n": 1}))),
        SendBatchRequest::new(event(json!({"n": 2}))),
    ];
    let statuses = client
        .events()
        .send_batch(&CancellationToken::new(), "ds", &batch)
        .await
        .unwrap();

    assert!(statuses[0].is_accepted());
    assert!(!statuses[1].is_accepted());
    assert_eq!(
        statuses[1].error.as_deref(),
        Some("event dropped due to administrative denylist")
    );
}

#[tokio::test]
async fn empty_batch_sends_nothing() {
    let (base_url, state, _h) = start_mock_server().await;
    let (client, _) = test_client(&base_url);

    let statuses = client
        .events()
        .send_batch(&CancellationToken::new(), "ds", &[])
        .await
        .unwrap();

    assert!(statuses.is_empty());
    assert!(state.requests().is_empty());
}
