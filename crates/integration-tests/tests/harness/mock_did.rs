//! Mock D-ID talks backend for integration tests
//!
//! Accepts talk submissions, optionally insists on one authorization scheme,
//! and serves job status for asynchronous talks.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Video URL every completed mock talk resolves to
pub const VIDEO_URL: &str = "https://d-id-talks-prod.s3.amazonaws.com/alma/result.mp4";

/// Job identifier handed out for asynchronous talks
pub const JOB_ID: &str = "tlk_mock_123";

/// How the mock answers a talk submission
#[derive(Debug, Clone)]
pub enum Submission {
    /// Answer with the finished video
    Finished,
    /// Answer with a job id; the status endpoint reports `started` this many
    /// times before `done`
    Pending { polls_before_done: u32 },
    /// Answer with a job id whose status never leaves `started`
    NeverFinishes,
    /// Answer with a job id whose status becomes `error`
    Fails,
    /// Answer with a fixed status and body
    Fixed { status: StatusCode, body: Value },
}

/// Builder for a [`MockDid`]
pub struct MockDidBuilder {
    submission: Submission,
    accepted_scheme: Option<&'static str>,
}

impl MockDidBuilder {
    /// Reject submissions whose `Authorization` scheme differs from `scheme`
    pub fn accept_only(mut self, scheme: &'static str) -> Self {
        self.accepted_scheme = Some(scheme);
        self
    }

    /// Reject every submission with 401
    pub fn reject_all_keys(self) -> Self {
        self.accept_only("none")
    }

    pub fn submission(mut self, submission: Submission) -> Self {
        self.submission = submission;
        self
    }

    pub async fn start(self) -> anyhow::Result<MockDid> {
        let state = Arc::new(MockDidState {
            submission: self.submission,
            accepted_scheme: self.accepted_scheme,
            create_count: AtomicU32::new(0),
            status_count: AtomicU32::new(0),
            authorizations: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
            wait_flags: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/talks", routing::post(handle_create_talk))
            .route("/talks/{id}", routing::get(handle_get_talk))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockDid { addr, shutdown, state })
    }
}

/// Mock D-ID backend recording every call it receives
pub struct MockDid {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockDidState>,
}

struct MockDidState {
    submission: Submission,
    accepted_scheme: Option<&'static str>,
    create_count: AtomicU32,
    status_count: AtomicU32,
    authorizations: Mutex<Vec<String>>,
    payloads: Mutex<Vec<Value>>,
    wait_flags: Mutex<Vec<bool>>,
}

impl MockDid {
    pub fn builder() -> MockDidBuilder {
        MockDidBuilder {
            submission: Submission::Finished,
            accepted_scheme: None,
        }
    }

    /// Start a mock that returns finished talks to any key
    pub async fn start() -> anyhow::Result<Self> {
        Self::builder().start().await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of talk submissions received
    pub fn create_count(&self) -> u32 {
        self.state.create_count.load(Ordering::Relaxed)
    }

    /// Number of job status requests received
    pub fn status_count(&self) -> u32 {
        self.state.status_count.load(Ordering::Relaxed)
    }

    /// `Authorization` headers of every submission, in order
    pub fn authorizations(&self) -> Vec<String> {
        self.state.authorizations.lock().unwrap().clone()
    }

    /// Body of the most recent submission
    pub fn last_payload(&self) -> Option<Value> {
        self.state.payloads.lock().unwrap().last().cloned()
    }

    /// Whether each submission asked the provider to wait for rendering
    pub fn wait_flags(&self) -> Vec<bool> {
        self.state.wait_flags.lock().unwrap().clone()
    }
}

impl Drop for MockDid {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[derive(Debug, Deserialize)]
struct CreateQuery {
    #[serde(default)]
    wait: Option<bool>,
}

fn authorization(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"kind": "AuthorizationError", "description": "Invalid credentials"})),
    )
        .into_response()
}

fn is_accepted(state: &MockDidState, authorization: &str) -> bool {
    state.accepted_scheme.is_none_or(|scheme| {
        authorization
            .split_once(' ')
            .is_some_and(|(prefix, _)| prefix.eq_ignore_ascii_case(scheme))
    })
}

async fn handle_create_talk(
    State(state): State<Arc<MockDidState>>,
    Query(query): Query<CreateQuery>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    state.create_count.fetch_add(1, Ordering::Relaxed);

    let authorization = authorization(&headers);
    state.authorizations.lock().unwrap().push(authorization.clone());
    state.payloads.lock().unwrap().push(payload);
    state.wait_flags.lock().unwrap().push(query.wait.unwrap_or(false));

    if !is_accepted(&state, &authorization) {
        return unauthorized();
    }

    match &state.submission {
        Submission::Finished => (
            StatusCode::CREATED,
            Json(json!({"id": JOB_ID, "status": "done", "result_url": VIDEO_URL})),
        )
            .into_response(),
        Submission::Pending { .. } | Submission::NeverFinishes | Submission::Fails => (
            StatusCode::CREATED,
            Json(json!({"id": JOB_ID, "status": "created", "created_at": "2024-05-01T10:00:00Z"})),
        )
            .into_response(),
        Submission::Fixed { status, body } => (*status, Json(body.clone())).into_response(),
    }
}

async fn handle_get_talk(
    State(state): State<Arc<MockDidState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let polls = state.status_count.fetch_add(1, Ordering::Relaxed) + 1;

    if !is_accepted(&state, &authorization(&headers)) {
        return unauthorized();
    }

    if id != JOB_ID {
        return (StatusCode::NOT_FOUND, Json(json!({"kind": "NotFoundError"}))).into_response();
    }

    let body = match &state.submission {
        Submission::Pending { polls_before_done } if polls > *polls_before_done => {
            json!({"id": id, "status": "done", "result_url": VIDEO_URL})
        }
        Submission::Fails => json!({"id": id, "status": "error", "error": {"kind": "FaceError"}}),
        _ => json!({"id": id, "status": "started"}),
    };

    Json(body).into_response()
}
