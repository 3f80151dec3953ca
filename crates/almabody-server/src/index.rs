use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Service banner served at `/`
#[derive(Debug, Serialize)]
pub struct Banner {
    status: &'static str,
    message: String,
    endpoints: Vec<String>,
}

impl Banner {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self {
            status: "ok",
            message: format!("Almabody ativo. Endpoints: {}", endpoints.join(", ")),
            endpoints,
        }
    }
}

pub async fn index_handler(State(banner): State<Arc<Banner>>) -> Response {
    Json(banner.as_ref()).into_response()
}
