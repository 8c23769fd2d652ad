//! Scripted stand-in for the embedding provider, serving canned responses
//! over a real socket.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted provider reply.
#[derive(Debug, Clone, Copy)]
pub enum StubReply {
    /// 200 with a vector of the given dimension.
    Vector(usize),
    /// A bare status code, e.g. 429 or 500.
    Status(u16),
}

/// Handle onto a running stub provider.
pub struct StubProvider {
    /// Endpoint URL to point the embedding client at.
    pub url: String,
    /// Number of requests received so far.
    pub calls: Arc<AtomicUsize>,
    /// Body of the most recent request.
    pub last_request: Arc<Mutex<Option<Value>>>,
}

#[derive(Clone)]
struct StubState {
    script: Arc<Vec<StubReply>>,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<Value>>>,
}

/// Spawn a stub provider answering each request with the next scripted reply
/// (the final entry repeats once the script runs out).
pub async fn spawn_stub_provider(script: Vec<StubReply>) -> StubProvider {
    let state = StubState {
        script: Arc::new(script),
        calls: Arc::new(AtomicUsize::new(0)),
        last_request: Arc::new(Mutex::new(None)),
    };
    let calls = state.calls.clone();
    let last_request = state.last_request.clone();

    let app = axum::Router::new().route("/", post(respond)).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub provider");
    let addr = listener.local_addr().expect("stub provider addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub provider");
    });

    StubProvider {
        url: format!("http://{addr}/"),
        calls,
        last_request,
    }
}

async fn respond(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    let n = state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(body);

    let reply = state
        .script
        .get(n)
        .or_else(|| state.script.last())
        .copied()
        .unwrap_or(StubReply::Status(500));

    match reply {
        StubReply::Vector(dimension) => {
            let embedding: Vec<f32> = (0..dimension)
                .map(|i| i as f32 / dimension.max(1) as f32)
                .collect();
            Json(json!({
                "data": [ { "embedding": embedding, "index": 0 } ],
                "model": "stub-embedding-model",
            }))
            .into_response()
        }
        StubReply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}
