use std::{sync::Arc, time::Duration};

use almabody_config::PollConfig;
use secrecy::SecretString;
use serde_json::Value;
use tokio::time::Instant;

use crate::{
    error::{Result, TalkError},
    extract::{JobStatus, extract_job_id, extract_video_url},
    provider::{ProviderReply, TalkProvider},
    scheme::{AuthScheme, Credential, PreferredScheme},
    types::{TalkPayload, TalkRequest, TalkResult},
};

/// Submits talks and resolves them to a video URL
pub struct Orchestrator {
    provider: Arc<dyn TalkProvider>,
    poll: PollConfig,
    call_timeout: Duration,
}

/// Position in the authorization retry sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Preferred(AuthScheme),
    Fallback(AuthScheme),
}

impl Attempt {
    const fn scheme(self) -> AuthScheme {
        match self {
            Self::Preferred(scheme) | Self::Fallback(scheme) => scheme,
        }
    }

    /// Next attempt after a 401, if any remains
    const fn after_unauthorized(self, preferred: PreferredScheme) -> Option<Self> {
        match (self, preferred.fallback) {
            (Self::Preferred(_), Some(fallback)) => Some(Self::Fallback(fallback)),
            _ => None,
        }
    }
}

/// Provider reply sorted by what the orchestrator does next
enum Outcome {
    Accepted(Value),
    Unauthorized(Value),
    Rejected(TalkError),
}

impl From<ProviderReply> for Outcome {
    fn from(reply: ProviderReply) -> Self {
        let ProviderReply { status, body } = reply;

        if status.is_success() {
            return Self::Accepted(body);
        }

        match status.as_u16() {
            401 => Self::Unauthorized(body),
            400 => Self::Rejected(TalkError::ProviderValidationError { body }),
            status => Self::Rejected(TalkError::ProviderHttpError { status, body }),
        }
    }
}

/// Progress of one job's status polling
struct PollState {
    job_id: String,
    attempts_elapsed: u32,
    deadline: Instant,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn TalkProvider>, poll: PollConfig, call_timeout: Duration) -> Self {
        Self {
            provider,
            poll,
            call_timeout,
        }
    }

    /// Submit `request` and resolve it to a video URL
    ///
    /// Local validation and credential checks happen before any provider
    /// call. A 401 on a bare key is retried once with the alternate scheme.
    pub async fn submit_talk(&self, request: &TalkRequest, credential: &Credential) -> Result<TalkResult> {
        request.validate()?;
        let preferred = credential.resolve()?;

        let payload = TalkPayload::from(request);
        let mut attempt = Attempt::Preferred(preferred.scheme);

        let body = loop {
            let authorization = credential.authorization(attempt.scheme());
            let reply = self.provider.create_talk(&payload, &authorization).await?;

            match Outcome::from(reply) {
                Outcome::Accepted(body) => break body,
                Outcome::Unauthorized(body) => match attempt.after_unauthorized(preferred) {
                    Some(next) => {
                        tracing::warn!(
                            provider = self.provider.name(),
                            rejected = %attempt.scheme(),
                            retry = %next.scheme(),
                            "provider rejected authorization scheme, retrying"
                        );
                        attempt = next;
                    }
                    None => return Err(TalkError::ProviderUnauthorized { body }),
                },
                Outcome::Rejected(error) => return Err(error),
            }
        };

        let scheme_used = attempt.scheme();

        if let Some(video_url) = extract_video_url(&body) {
            return Ok(TalkResult {
                video_url: Some(video_url.to_owned()),
                job_id: extract_job_id(&body).map(str::to_owned),
                raw: body,
                scheme_used,
                poll_attempts: 0,
            });
        }

        let Some(job_id) = extract_job_id(&body).map(str::to_owned) else {
            tracing::warn!(provider = self.provider.name(), "talk response has neither video URL nor job id");
            return Err(TalkError::NoVideoUrlInResponse { raw: body });
        };

        tracing::debug!(provider = self.provider.name(), %job_id, "talk accepted asynchronously, polling");

        self.poll_job(job_id, credential.authorization(scheme_used), scheme_used, body)
            .await
    }

    /// Poll the job-status endpoint until a video URL appears or the budget runs out
    async fn poll_job(
        &self,
        job_id: String,
        authorization: SecretString,
        scheme_used: AuthScheme,
        initial: Value,
    ) -> Result<TalkResult> {
        let mut state = PollState {
            job_id,
            attempts_elapsed: 0,
            deadline: Instant::now() + self.poll_window(),
        };
        let mut last = initial;

        while state.attempts_elapsed < self.poll.attempts && Instant::now() < state.deadline {
            tokio::time::sleep(self.poll.interval).await;
            state.attempts_elapsed += 1;

            let reply = self.provider.get_talk(&state.job_id, &authorization).await?;

            let body = match Outcome::from(reply) {
                Outcome::Accepted(body) => body,
                Outcome::Unauthorized(body) => return Err(TalkError::ProviderUnauthorized { body }),
                Outcome::Rejected(error) => return Err(error),
            };

            if let Some(video_url) = extract_video_url(&body) {
                tracing::debug!(
                    provider = self.provider.name(),
                    job_id = %state.job_id,
                    attempts = state.attempts_elapsed,
                    "talk ready"
                );

                return Ok(TalkResult {
                    video_url: Some(video_url.to_owned()),
                    job_id: Some(state.job_id),
                    raw: body,
                    scheme_used,
                    poll_attempts: state.attempts_elapsed,
                });
            }

            match JobStatus::from_body(&body) {
                JobStatus::Failed => return Err(TalkError::JobFailed { raw: body }),
                JobStatus::Done => return Err(TalkError::NoVideoUrlInResponse { raw: body }),
                JobStatus::Pending => last = body,
            }
        }

        tracing::warn!(
            provider = self.provider.name(),
            job_id = %state.job_id,
            attempts = state.attempts_elapsed,
            "talk not ready within polling budget"
        );

        Err(TalkError::PollTimeout {
            attempts: state.attempts_elapsed,
            raw: last,
        })
    }

    /// Upper bound on time spent polling one job
    fn poll_window(&self) -> Duration {
        self.poll
            .interval
            .saturating_mul(self.poll.attempts)
            .saturating_add(self.call_timeout)
    }
}
