//! Stub routing API served by axum on an ephemeral port

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::task::JoinHandle;

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
}

/// A routing API that answers every `/quote` with the same canned response.
pub struct RoutingApiStub {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<HashMap<String, String>>>>,
    handle: JoinHandle<()>,
}

impl RoutingApiStub {
    pub async fn spawn(status: u16, body: impl Into<String>) -> Self {
        Self::spawn_with_delay(status, body, Duration::ZERO).await
    }

    pub async fn spawn_with_delay(status: u16, body: impl Into<String>, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let last_query = Arc::new(Mutex::new(None));
        let state = StubState {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.into(),
            delay,
            hits: hits.clone(),
            last_query: last_query.clone(),
        };

        let app = Router::new().route("/quote", get(quote)).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub routing API");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub routing API");
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
            last_query,
            handle,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn hit_counter(&self) -> Arc<AtomicUsize> {
        self.hits.clone()
    }

    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.last_query.lock().unwrap().clone()
    }
}

impl Drop for RoutingApiStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn quote(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = Some(query);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
}

/// Base URL nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";
