//! Shared test utilities for integration tests.
//!
//! Runs an in-process axum stand-in for the Honeycomb API that records every
//! request and computes query results after a configurable number of polls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use honeycomb_api::client::{HoneycombClient, PollPolicy, Sleeper};
use honeycomb_api::config::Config;
use honeycomb_api::ClientBuilder;
use serde_json::{json, Value};

pub const TEST_API_KEY: &str = "test-key";

/// One request as seen by the mock service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Raw (still percent-encoded) request path.
    pub raw_path: String,
    /// Dataset after percent-decoding by the router.
    pub dataset: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug, Clone)]
struct StoredResult {
    query_id: String,
    polls_remaining: u32,
}

/// Mutable state of the mock service.
#[derive(Default)]
pub struct MockState {
    pub requests: Mutex<Vec<RecordedRequest>>,
    queries: Mutex<HashMap<String, Value>>,
    results: Mutex<HashMap<String, StoredResult>>,
    /// Number of result fetches that still report `complete: false`.
    /// Zero means results are complete on creation.
    pub polls_until_complete: AtomicU32,
    /// Count of `GET /1/query_results/...` calls.
    pub result_fetches: AtomicU32,
    /// Replace the batch response body.
    pub batch_response: Mutex<Option<Value>>,
    /// Fail the N-th result fetch with this status and body.
    pub fail_result_fetch: Mutex<Option<(u32, u16, String)>>,
    /// Answer every request with this status and body.
    pub fail_all: Mutex<Option<(u16, String)>>,
    /// Delay before answering any request.
    pub delay: Mutex<Option<Duration>>,
}

impl MockState {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_polls_until_complete(&self, polls: u32) {
        self.polls_until_complete.store(polls, Ordering::SeqCst);
    }

    pub fn result_fetches(&self) -> u32 {
        self.result_fetches.load(Ordering::SeqCst)
    }
}

type Shared = Arc<MockState>;

/// Start the mock service on a random port. Returns the base URL, its state
/// and a handle to shut it down.
pub async fn start_mock_server() -> (String, Shared, tokio::task::JoinHandle<()>) {
    init_tracing();
    let state: Shared = Arc::new(MockState::default());
    let app = Router::new()
        .route("/1/events/{dataset}", post(send_event))
        .route("/1/batch/{dataset}", post(send_batch))
        .route("/1/queries/{dataset}", post(create_query))
        .route("/1/queries/{dataset}/{id}", get(get_query))
        .route("/1/query_results/{dataset}", post(create_result))
        .route("/1/query_results/{dataset}/{id}", get(get_result))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (base_url, state, handle)
}

/// Route client logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A sleeper that records waits and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Client for the mock service with the default poll policy and a
/// recording sleeper.
pub fn test_client(base_url: &str) -> (HoneycombClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = ClientBuilder::new(Config::new(TEST_API_KEY).with_base_url(base_url))
        .with_timeout(Duration::from_secs(5))
        .with_poll_policy(PollPolicy::default())
        .with_sleeper(sleeper.clone())
        .build()
        .unwrap();
    (client, sleeper)
}

/// Build an event payload from a JSON object literal.
pub fn event(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().expect("event must be an object").clone()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn intercept(
    state: &MockState,
    method: Method,
    uri: &Uri,
    dataset: &str,
    headers: &HeaderMap,
    body: &Bytes,
) -> Option<Response> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let api_key = header("x-honeycomb-team");
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        raw_path: uri.path().to_string(),
        dataset: dataset.to_string(),
        api_key: api_key.clone(),
        content_type: header("content-type"),
        body: body.to_vec(),
    });

    let delay = *state.delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if api_key.as_deref() != Some(TEST_API_KEY) {
        return Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "unknown API key - check your credentials"})),
            )
                .into_response(),
        );
    }

    let forced = state.fail_all.lock().unwrap().clone();
    if let Some((status, body)) = forced {
        return Some(raw_response(status, body));
    }
    None
}

fn raw_response(status: u16, body: String) -> Response {
    (StatusCode::from_u16(status).unwrap(), body).into_response()
}

async fn send_event(
    State(state): State<Shared>,
    Path(dataset): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(r) = intercept(&state, Method::POST, &uri, &dataset, &headers, &body).await {
        return r;
    }
    if serde_json::from_slice::<serde_json::Map<String, Value>>(&body).is_err() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "request body should be a JSON object"})))
            .into_response();
    }
    StatusCode::OK.into_response()
}

async fn send_batch(
    State(state): State<Shared>,
    Path(dataset): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(r) = intercept(&state, Method::POST, &uri, &dataset, &headers, &body).await {
        return r;
    }
    let override_body = state.batch_response.lock().unwrap().clone();
    if let Some(body) = override_body {
        return Json(body).into_response();
    }
    let events: Vec<Value> = match serde_json::from_slice(&body) {
        Ok(events) => events,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "expected an array"})))
                .into_response()
        }
    };
    let statuses: Vec<Value> = events.iter().map(|_| json!({"status": 202})).collect();
    Json(Value::Array(statuses)).into_response()
}

async fn create_query(
    State(state): State<Shared>,
    Path(dataset): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(r) = intercept(&state, Method::POST, &uri, &dataset, &headers, &body).await {
        return r;
    }
    let mut spec: Value = match serde_json::from_slice(&body) {
        Ok(spec) => spec,
        Err(_) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"status": 422, "message": "invalid query specification"})),
            )
                .into_response()
        }
    };
    let id = uuid::Uuid::new_v4().simple().to_string()[..11].to_string();
    spec["id"] = json!(id);
    state.queries.lock().unwrap().insert(id, spec.clone());
    Json(spec).into_response()
}

async fn get_query(
    State(state): State<Shared>,
    Path((dataset, id)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Some(r) = intercept(&state, Method::GET, &uri, &dataset, &headers, &Bytes::new()).await {
        return r;
    }
    match state.queries.lock().unwrap().get(&id) {
        Some(spec) => Json(spec.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "query not found"}))).into_response(),
    }
}

async fn create_result(
    State(state): State<Shared>,
    Path(dataset): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(r) = intercept(&state, Method::POST, &uri, &dataset, &headers, &body).await {
        return r;
    }
    let query_id = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v["query_id"].as_str().map(str::to_string));
    let Some(query_id) = query_id else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "query_id is required"})))
            .into_response();
    };
    if !state.queries.lock().unwrap().contains_key(&query_id) {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "query not found"}))).into_response();
    }

    let id = format!("result-{}", uuid::Uuid::new_v4().simple());
    let polls_remaining = state.polls_until_complete.load(Ordering::SeqCst);
    state.results.lock().unwrap().insert(
        id.clone(),
        StoredResult {
            query_id: query_id.clone(),
            polls_remaining,
        },
    );
    Json(result_body(&id, &query_id, polls_remaining == 0)).into_response()
}

async fn get_result(
    State(state): State<Shared>,
    Path((dataset, id)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Some(r) = intercept(&state, Method::GET, &uri, &dataset, &headers, &Bytes::new()).await {
        return r;
    }
    let fetch = state.result_fetches.fetch_add(1, Ordering::SeqCst) + 1;
    let failure = state.fail_result_fetch.lock().unwrap().clone();
    if let Some((attempt, status, body)) = failure {
        if attempt == fetch {
            return raw_response(status, body);
        }
    }

    let mut results = state.results.lock().unwrap();
    let Some(stored) = results.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "query result not found"})))
            .into_response();
    };
    stored.polls_remaining = stored.polls_remaining.saturating_sub(1);
    Json(result_body(&id, &stored.query_id, stored.polls_remaining == 0)).into_response()
}

fn result_body(id: &str, query_id: &str, complete: bool) -> Value {
    if !complete {
        return json!({"id": id, "complete": false});
    }
    json!({
        "id": id,
        "complete": true,
        "data": {
            "series": [
                {"time": "2024-05-01T10:00:00Z", "data": {"COUNT": 2}},
                {"time": "2024-05-01T10:01:00Z", "data": {"COUNT": 1}}
            ],
            "results": [{"data": {"COUNT": 3}}]
        },
        "links": {
            "query_url": format!("https://ui.honeycomb.io/q/{query_id}"),
            "graph_image_url": format!("https://ui.honeycomb.io/q/{query_id}/graph.png")
        }
    })
}
