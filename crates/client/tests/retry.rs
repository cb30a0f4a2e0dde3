//! Retry behavior, attempt accounting and failure classification against a
//! live stub server.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use storefront_client::{CallClient, ClientConfig, RemoteCallError, ServiceClient};

struct StubServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn fast_client(base_url: &str) -> ServiceClient {
    ServiceClient::with_config(
        base_url,
        ClientConfig {
            timeout: Duration::from_secs(1),
            max_retries: 3,
            retry_delay: Duration::from_millis(10),
        },
    )
    .expect("client should build")
}

fn counting_route(
    hits: Arc<AtomicU32>,
    respond: impl Fn(u32) -> axum::response::Response + Clone + Send + Sync + 'static,
) -> Router {
    Router::new()
        .route(
            "/things/1",
            get(move |State(hits): State<Arc<AtomicU32>>| {
                let respond = respond.clone();
                async move {
                    let attempt = hits.fetch_add(1, Ordering::SeqCst);
                    respond(attempt)
                }
            }),
        )
        .with_state(hits)
}

#[tokio::test]
async fn transient_failures_then_success_matches_first_attempt_success() {
    // Flaky upstream: two failures, then the real payload.
    let flaky_hits = Arc::new(AtomicU32::new(0));
    let flaky = StubServer::spawn(counting_route(flaky_hits.clone(), |attempt| {
        if attempt < 2 {
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "busy"}))).into_response()
        } else {
            Json(json!({"id": "1", "stock": 5})).into_response()
        }
    }))
    .await;

    // Healthy upstream serving the same payload on the first attempt.
    let healthy_hits = Arc::new(AtomicU32::new(0));
    let healthy = StubServer::spawn(counting_route(healthy_hits.clone(), |_| {
        Json(json!({"id": "1", "stock": 5})).into_response()
    }))
    .await;

    let recovered = fast_client(&flaky.base_url).get("/things/1").await.unwrap();
    let immediate = fast_client(&healthy.base_url).get("/things/1").await.unwrap();

    assert_eq!(recovered, immediate);
    assert_eq!(flaky_hits.load(Ordering::SeqCst), 3);
    assert_eq!(healthy_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_retries_surface_the_final_status() {
    let hits = Arc::new(AtomicU32::new(0));
    let srv = StubServer::spawn(counting_route(hits.clone(), |_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"message": "upstream exploded"})),
        )
            .into_response()
    }))
    .await;

    let err = fast_client(&srv.base_url).get("/things/1").await.unwrap_err();

    assert_eq!(err, RemoteCallError::new(503, "upstream exploded"));
    // One initial attempt plus three retries.
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn not_found_burns_the_full_retry_budget() {
    // Retries are uniform across failures: a 404 is resubmitted like a 503.
    let hits = Arc::new(AtomicU32::new(0));
    let srv = StubServer::spawn(counting_route(hits.clone(), |_| {
        (StatusCode::NOT_FOUND, Json(json!({"message": "no such thing"}))).into_response()
    }))
    .await;

    let err = fast_client(&srv.base_url).get("/things/1").await.unwrap_err();

    assert_eq!(err, RemoteCallError::new(404, "Resource not found"));
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn post_keeps_the_remote_not_found_message() {
    let app = Router::new().route(
        "/things/1/stock",
        post(|| async {
            (StatusCode::NOT_FOUND, Json(json!({"message": "missing"}))).into_response()
        }),
    );
    let srv = StubServer::spawn(app).await;

    let err = fast_client(&srv.base_url)
        .post("/things/1/stock", json!({"quantity": 2}))
        .await
        .unwrap_err();

    assert_eq!(err, RemoteCallError::new(404, "missing"));
}

#[tokio::test]
async fn error_body_without_message_uses_the_default() {
    let app = Router::new().route(
        "/things/1",
        get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"oops": true}))).into_response() }),
    );
    let srv = StubServer::spawn(app).await;

    let err = fast_client(&srv.base_url).get("/things/1").await.unwrap_err();

    assert_eq!(err, RemoteCallError::new(400, "Service request failed"));
}

#[tokio::test]
async fn transport_failure_maps_to_unknown_error() {
    // Grab a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = fast_client(&format!("http://{}", addr));
    let err = client.get("/things/1").await.unwrap_err();

    assert_eq!(err, RemoteCallError::new(500, "Unknown error occurred"));
}

#[tokio::test]
async fn non_json_success_body_passes_through_as_text() {
    let app = Router::new().route("/ping", get(|| async { "pong" }));
    let srv = StubServer::spawn(app).await;

    let value = fast_client(&srv.base_url).get("/ping").await.unwrap();

    assert_eq!(value, serde_json::Value::String("pong".to_string()));
}
