//! REST client against an in-process fake compute API.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use resbind_core::error::ResBindError;
use resbind_core::PolicyBinding;
use resbind_provider::compute::{PolicyClient, RestPolicyClient};
use resbind_provider::config::{ComputeSection, CredentialsSection};

#[derive(Debug, Clone)]
struct Submitted {
    path: String,
    method: String,
    request_id: Option<String>,
    auth: Option<String>,
    body: Value,
}

#[derive(Default)]
struct FakeCompute {
    submitted: Mutex<Vec<Submitted>>,
    wait_calls: AtomicUsize,
    token_calls: AtomicUsize,
    /// RUNNING answers from the wait endpoint before DONE.
    running_rounds: usize,
    op_error: Option<Value>,
    submit_error: Option<(u16, Value)>,
}

type Shared = Arc<FakeCompute>;

async fn submit(
    State(fake): State<Shared>,
    Path((project, zone, instance, method)): Path<(String, String, String, String)>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.submitted.lock().unwrap().push(Submitted {
        path: format!("{project}/{zone}/{instance}"),
        method,
        request_id: q.get("requestId").cloned(),
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if let Some((code, err)) = &fake.submit_error {
        return (StatusCode::from_u16(*code).unwrap(), Json(err.clone()));
    }
    (StatusCode::OK, Json(json!({ "name": "operation-1", "status": "RUNNING" })))
}

async fn wait(
    State(fake): State<Shared>,
    Path((_project, _zone, op)): Path<(String, String, String)>,
) -> Json<Value> {
    let n = fake.wait_calls.fetch_add(1, Ordering::SeqCst);
    if n < fake.running_rounds {
        return Json(json!({ "name": op, "status": "RUNNING" }));
    }
    match &fake.op_error {
        Some(err) => Json(json!({ "name": op, "status": "DONE", "error": err })),
        None => Json(json!({ "name": op, "status": "DONE" })),
    }
}

async fn token(State(fake): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    fake.token_calls.fetch_add(1, Ordering::SeqCst);
    if headers.get("metadata-flavor").and_then(|v| v.to_str().ok()) != Some("Google") {
        return (StatusCode::FORBIDDEN, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({ "access_token": "meta-token", "expires_in": 3599, "token_type": "Bearer" })),
    )
}

async fn start(fake: FakeCompute) -> (String, Shared) {
    let fake = Arc::new(fake);
    let app = Router::new()
        .route(
            "/compute/v1/projects/:project/zones/:zone/instances/:instance/:method",
            post(submit),
        )
        .route(
            "/compute/v1/projects/:project/zones/:zone/operations/:op/wait",
            post(wait),
        )
        .route("/token", get(token))
        .with_state(fake.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), fake)
}

fn client(base: &str, access_token: Option<&str>) -> RestPolicyClient {
    let compute = ComputeSection {
        endpoint: format!("{base}/compute/v1"),
        request_timeout_ms: 5000,
        connect_timeout_ms: 1000,
    };
    let creds = CredentialsSection {
        access_token: access_token.map(str::to_string),
        metadata_endpoint: format!("{base}/token"),
    };
    RestPolicyClient::new(&compute, &creds).unwrap()
}

fn b() -> PolicyBinding {
    PolicyBinding::new("p1", "z1", "i1", "pol-a")
}

#[tokio::test]
async fn add_submits_and_waits_until_done() {
    let (base, fake) = start(FakeCompute {
        running_rounds: 2,
        ..FakeCompute::default()
    })
    .await;

    client(&base, Some("tok")).add(&b()).await.unwrap();

    let sent = fake.submitted.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].path, "p1/z1/i1");
    assert_eq!(sent[0].method, "addResourcePolicies");
    assert_eq!(sent[0].auth.as_deref(), Some("Bearer tok"));
    assert_eq!(sent[0].body, json!({ "resourcePolicies": ["pol-a"] }));
    assert_eq!(sent[0].request_id.as_ref().unwrap().len(), 36);
    assert_eq!(fake.wait_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn each_request_gets_a_fresh_request_id() {
    let (base, fake) = start(FakeCompute::default()).await;
    let c = client(&base, Some("tok"));

    c.add(&b()).await.unwrap();
    c.remove(&b()).await.unwrap();

    let sent = fake.submitted.lock().unwrap().clone();
    assert_eq!(sent[1].method, "removeResourcePolicies");
    assert_ne!(sent[0].request_id, sent[1].request_id);
}

#[tokio::test]
async fn operation_error_is_returned() {
    let (base, _fake) = start(FakeCompute {
        op_error: Some(json!({ "errors": [
            { "code": "RESOURCE_NOT_FOUND", "message": "The resource 'pol-a' was not found" }
        ]})),
        ..FakeCompute::default()
    })
    .await;

    let err = client(&base, Some("tok")).remove(&b()).await.unwrap_err();

    assert_eq!(
        err,
        ResBindError::Operation("RESOURCE_NOT_FOUND: The resource 'pol-a' was not found".into())
    );
}

#[tokio::test]
async fn submit_error_is_returned_without_waiting() {
    let (base, fake) = start(FakeCompute {
        submit_error: Some((
            404,
            json!({ "error": {
                "code": 404,
                "message": "The resource 'i1' was not found",
                "status": "NOT_FOUND"
            } }),
        )),
        ..FakeCompute::default()
    })
    .await;

    let err = client(&base, Some("tok")).add(&b()).await.unwrap_err();

    assert_eq!(
        err,
        ResBindError::Submit("404 (NOT_FOUND): The resource 'i1' was not found".into())
    );
    assert_eq!(fake.wait_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn metadata_token_is_fetched_once_and_reused() {
    let (base, fake) = start(FakeCompute::default()).await;
    let c = client(&base, None);

    c.add(&b()).await.unwrap();
    c.remove(&b()).await.unwrap();

    assert_eq!(fake.token_calls.load(Ordering::SeqCst), 1);
    let sent = fake.submitted.lock().unwrap().clone();
    assert!(sent.iter().all(|s| s.auth.as_deref() == Some("Bearer meta-token")));
}

#[test]
fn bad_endpoint_is_a_client_build_error() {
    let compute = ComputeSection {
        endpoint: "not a url".into(),
        ..ComputeSection::default()
    };
    let err = RestPolicyClient::new(&compute, &CredentialsSection::default())
        .err()
        .unwrap();
    assert_eq!(err.code().as_str(), "CLIENT_BUILD");
}
