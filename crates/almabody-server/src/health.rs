use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use http::StatusCode;
use serde::Serialize;

/// Settings a talk needs that are absent from the configuration
#[derive(Debug, Clone)]
pub struct Readiness {
    missing: Arc<[&'static str]>,
}

impl Readiness {
    pub fn new(missing: Vec<&'static str>) -> Self {
        Self { missing: missing.into() }
    }

    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Serialize)]
struct HealthBody<'a> {
    status: &'static str,
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<&'a [&'static str]>,
}

/// Readiness handler
///
/// Answers 503 until the provider credential, default image and default voice
/// are all configured.
pub async fn health_handler(State(readiness): State<Readiness>) -> impl IntoResponse {
    let ready = readiness.is_ready();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthBody {
        status: if ready { "ok" } else { "unavailable" },
        ready,
        missing: (!ready).then_some(&*readiness.missing),
    };

    (status, Json(body)).into_response()
}
