//! Talking-avatar video synthesis
//!
//! Resolves the provider credential scheme, submits talks to D-ID, normalizes
//! its response shapes and polls asynchronous jobs until a video URL appears.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod extract;
mod http_client;
mod orchestrator;
mod provider;
mod request;
mod scheme;
mod server;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};

pub use error::{Result, TalkError};
pub use extract::{JOB_ID_FIELD, JobStatus, VIDEO_URL_FIELDS, extract_job_id, extract_video_url};
pub use orchestrator::Orchestrator;
pub use provider::{ProviderReply, TalkProvider, did::DidProvider};
pub use scheme::{AuthScheme, Credential, CredentialScheme, PreferredScheme, build_auth_header, resolve_scheme};
pub use server::{SayError, Server, TalkServerBuilder};
pub use types::{SayRequest, SayResponse, TalkPayload, TalkRequest, TalkResult, VoiceProvider};
use request::ExtractPayload;

/// Build the talk server from configuration
pub fn build_server(config: &almabody_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(TalkServerBuilder::new(config).build());

    if config.talk.api_key.is_none() {
        tracing::debug!("No D-ID API key configured, /say requests will fail until one is set");
    }

    Ok(server)
}

/// Create the endpoint router for talks
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route("/say", post(say))
}

/// Handle talk requests
async fn say(
    State(server): State<Arc<Server>>,
    ExtractPayload(request): ExtractPayload<SayRequest>,
) -> std::result::Result<Json<SayResponse>, SayError> {
    tracing::debug!(
        has_text = request.text.is_some(),
        has_prompt = request.prompt.is_some(),
        "say handler called"
    );

    let response = server.say(request).await?;

    tracing::debug!(job_id = response.job_id.as_deref(), "talk complete");

    Ok(Json(response))
}
