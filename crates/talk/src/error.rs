use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use script::ScriptError;
use serde_json::Value;
use thiserror::Error;

use crate::types::SayResponse;

pub type Result<T> = std::result::Result<T, TalkError>;

/// Failures of a single `/say` request
///
/// Every variant is scoped to the request that produced it. Variants that
/// originate at the provider carry its raw body for diagnostics.
#[derive(Debug, Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TalkError {
    /// No provider credential is configured
    #[error("missing D-ID API key")]
    MissingCredential,

    /// No avatar image in the request or the configuration
    #[error("missing image URL: set talk.image_url or send image_url")]
    MissingImageUrl,

    /// The avatar image is not an absolute http(s) URL
    #[error("invalid image URL: {0}")]
    InvalidImageUrl(String),

    /// Nothing to say
    #[error("text must not be empty")]
    EmptyText,

    /// The request body could not be read
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The provider rejected every authorization scheme we are allowed to try
    #[error("provider rejected the API key")]
    ProviderUnauthorized { body: Value },

    /// The provider rejected the payload
    #[error("provider rejected the request")]
    ProviderValidationError { body: Value },

    /// Any other non-success provider status
    #[error("provider returned HTTP {status}")]
    ProviderHttpError { status: u16, body: Value },

    /// A successful provider response carried neither a video URL nor a job id
    #[error("provider response contains no video URL")]
    NoVideoUrlInResponse { raw: Value },

    /// The provider reported the talk job as failed
    #[error("provider reported the talk job as failed")]
    JobFailed { raw: Value },

    /// The job did not produce a video within the polling budget
    #[error("video not ready after {attempts} status checks")]
    PollTimeout { attempts: u32, raw: Value },

    /// The provider could not be reached
    #[error("provider request failed: {0}")]
    NetworkError(String),

    /// The whole request exceeded its wall-clock budget
    #[error("request exceeded its {}s deadline", .0.as_secs())]
    DeadlineExceeded(Duration),

    /// Script generation failed
    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl TalkError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Script(e) => e.kind(),
            other => other.into(),
        }
    }

    /// HTTP status returned to the caller
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingImageUrl
            | Self::InvalidImageUrl(_)
            | Self::EmptyText
            | Self::InvalidBody(_)
            | Self::ProviderValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::MissingCredential | Self::Script(ScriptError::MissingLlmCredential) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ProviderHttpError { status: 429, .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::PollTimeout { .. } | Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::ProviderUnauthorized { .. }
            | Self::ProviderHttpError { .. }
            | Self::NoVideoUrlInResponse { .. }
            | Self::JobFailed { .. }
            | Self::NetworkError(_)
            | Self::Script(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Raw provider body, when the failure came from the provider
    pub const fn raw(&self) -> Option<&Value> {
        match self {
            Self::ProviderUnauthorized { body }
            | Self::ProviderValidationError { body }
            | Self::ProviderHttpError { body, .. } => Some(body),
            Self::NoVideoUrlInResponse { raw } | Self::JobFailed { raw } | Self::PollTimeout { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Whether the failure was detected before contacting any provider
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::MissingImageUrl
                | Self::InvalidImageUrl(_)
                | Self::EmptyText
                | Self::InvalidBody(_)
                | Self::Script(ScriptError::MissingLlmCredential)
        )
    }
}

impl IntoResponse for TalkError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::warn!(kind = self.kind(), status = status.as_u16(), "say request failed: {self}");
        } else {
            tracing::debug!(kind = self.kind(), status = status.as_u16(), "say request rejected: {self}");
        }

        (status, Json(SayResponse::failure(&self, None))).into_response()
    }
}
