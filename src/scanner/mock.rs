//! In-process stand-in for the reputation service, used by tests.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::config::VirusTotalConfig;

use super::analysis::API_KEY_HEADER;

pub const TEST_API_KEY: &str = "test-key";
pub const TEST_SCAN_ID: &str = "u-3f2a9c-1760000000";

#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    pub submit_status: Option<u16>,
    pub analysis_status: Option<u16>,
    pub submit_delay: Option<Duration>,
    pub malformed_analysis: bool,
    /// Number of analysis fetches answered as `queued` before `completed`.
    pub queued_fetches: usize,
}

#[derive(Debug, Default)]
pub struct MockState {
    behavior: MockBehavior,
    pub submissions: AtomicUsize,
    pub fetches: AtomicUsize,
    pub last_url: Mutex<Option<String>>,
}

impl MockState {
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.submissions() + self.fetches()
    }
}

pub struct MockVirusTotal {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockVirusTotal {
    pub async fn spawn(behavior: MockBehavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/v3/urls", post(submit))
            .route("/api/v3/analyses/{id}", get(analysis))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
        let addr = listener.local_addr().expect("mock addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}/api/v3", addr),
            state,
        }
    }

    pub fn config(&self, api_key: Option<&str>) -> VirusTotalConfig {
        VirusTotalConfig {
            api_key: api_key.map(str::to_string),
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(5),
            analysis_delay: Duration::ZERO,
            max_polls: 1,
            report_timeouts: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmitForm {
    url: String,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == TEST_API_KEY)
}

fn error_status(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": {"code": "MockError"}}))).into_response()
}

async fn submit(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<SubmitForm>,
) -> Response {
    state.submissions.fetch_add(1, Ordering::SeqCst);
    *state.last_url.lock().unwrap() = Some(form.url);

    if let Some(delay) = state.behavior.submit_delay {
        tokio::time::sleep(delay).await;
    }
    if !authorized(&headers) {
        return error_status(401);
    }
    if let Some(code) = state.behavior.submit_status {
        return error_status(code);
    }

    Json(json!({"data": {"type": "analysis", "id": TEST_SCAN_ID}})).into_response()
}

async fn analysis(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let seen = state.fetches.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) {
        return error_status(401);
    }
    if let Some(code) = state.behavior.analysis_status {
        return error_status(code);
    }
    if id != TEST_SCAN_ID {
        return error_status(404);
    }
    if state.behavior.malformed_analysis {
        return Json(json!({"data": {"id": id}})).into_response();
    }

    let body = if seen < state.behavior.queued_fetches {
        json!({"data": {"id": id, "attributes": {
            "status": "queued",
            "stats": {"harmless": 0, "malicious": 0, "suspicious": 0, "undetected": 0, "timeout": 0}
        }}})
    } else {
        json!({"data": {"id": id, "attributes": {
            "status": "completed",
            "stats": {"harmless": 68, "malicious": 3, "suspicious": 1, "undetected": 22, "timeout": 0}
        }}})
    };
    Json(body).into_response()
}
