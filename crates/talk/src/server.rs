use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

use almabody_config::Config;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use script::{ScriptGenerator, TextGenerator};

use crate::{
    error::TalkError,
    orchestrator::Orchestrator,
    provider::{TalkProvider, did::DidProvider},
    scheme::Credential,
    types::{SayRequest, SayResponse, TalkRequest, VoiceProvider},
};

/// Values used when a caller leaves a field out
#[derive(Debug, Clone)]
struct Defaults {
    text: String,
    image_url: String,
    voice_id: String,
    provider: VoiceProvider,
}

/// Talk server resolving `/say` requests into avatar videos
pub struct Server {
    orchestrator: Orchestrator,
    credential: Credential,
    defaults: Defaults,
    script: Arc<dyn TextGenerator>,
    request_deadline: Duration,
}

/// A failed `/say` request, with the generated text when there was one
#[derive(Debug)]
pub struct SayError {
    pub error: TalkError,
    pub answer: Option<String>,
}

impl From<TalkError> for SayError {
    fn from(error: TalkError) -> Self {
        Self { error, answer: None }
    }
}

impl IntoResponse for SayError {
    fn into_response(self) -> Response {
        let Self { error, answer } = self;

        if answer.is_none() {
            return error.into_response();
        }

        let status = error.status_code();
        tracing::warn!(kind = error.kind(), status = status.as_u16(), "say request failed after script generation: {error}");

        (status, Json(SayResponse::failure(&error, answer))).into_response()
    }
}

impl Server {
    /// Resolve the spoken text, submit the talk and wait for the video
    ///
    /// The whole pipeline runs under the configured request deadline. Text
    /// generated from a prompt is kept in the error when the deadline
    /// expires afterwards.
    pub async fn say(&self, request: SayRequest) -> Result<SayResponse, SayError> {
        let generated = OnceLock::new();

        let outcome = tokio::time::timeout(self.request_deadline, self.run(request, &generated)).await;

        match outcome {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(deadline_secs = self.request_deadline.as_secs(), "say request exceeded its deadline");
                Err(SayError {
                    error: TalkError::DeadlineExceeded(self.request_deadline),
                    answer: generated.into_inner(),
                })
            }
        }
    }

    async fn run(&self, request: SayRequest, generated: &OnceLock<String>) -> Result<SayResponse, SayError> {
        let SayRequest {
            text,
            image_url,
            voice_id,
            prompt,
        } = request;

        let (text, answer) = match (text, prompt.filter(|p| !p.trim().is_empty())) {
            (Some(text), _) => (text, None),
            (None, Some(prompt)) => {
                let text = self.script.generate_text(&prompt).await.map_err(TalkError::from)?;
                tracing::debug!(chars = text.chars().count(), "script generated from prompt");
                let _ = generated.set(text.clone());
                (text.clone(), Some(text))
            }
            (None, None) => (self.defaults.text.clone(), None),
        };

        let talk = TalkRequest {
            text,
            image_url: image_url.unwrap_or_else(|| self.defaults.image_url.clone()),
            voice_id: voice_id.unwrap_or_else(|| self.defaults.voice_id.clone()),
            provider: self.defaults.provider,
        };

        match self.orchestrator.submit_talk(&talk, &self.credential).await {
            Ok(result) => Ok(SayResponse::success(result, answer)),
            Err(error) => Err(SayError { error, answer }),
        }
    }
}

/// Builder for constructing the talk server from configuration
pub struct TalkServerBuilder<'a> {
    config: &'a Config,
    provider: Option<Arc<dyn TalkProvider>>,
    script: Option<Arc<dyn TextGenerator>>,
}

impl<'a> TalkServerBuilder<'a> {
    pub const fn new(config: &'a Config) -> Self {
        Self {
            config,
            provider: None,
            script: None,
        }
    }

    /// Replace the configured D-ID client
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn TalkProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the configured script generator
    #[must_use]
    pub fn script(mut self, script: Arc<dyn TextGenerator>) -> Self {
        self.script = Some(script);
        self
    }

    pub fn build(self) -> Server {
        let talk = &self.config.talk;

        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(DidProvider::from_config(talk)));

        let script = self.script.unwrap_or_else(|| {
            let generator = ScriptGenerator::from_config(&self.config.script);

            if !generator.is_configured() {
                tracing::debug!("No script API key configured, prompts will be rejected");
            }

            Arc::new(generator)
        });

        let credential = Credential::from_config(talk.api_key.as_ref());

        tracing::debug!(
            provider = provider.name(),
            credential = ?credential,
            wait_for_completion = talk.wait_for_completion,
            poll_attempts = talk.poll.attempts,
            "Talk server initialized"
        );

        Server {
            orchestrator: Orchestrator::new(provider, talk.poll.clone(), talk.request_timeout),
            credential,
            defaults: Defaults {
                text: talk.default_text.clone(),
                image_url: talk.image_url.clone(),
                voice_id: talk.voice_id.clone(),
                provider: talk.voice_provider.into(),
            },
            script,
            request_deadline: self.config.server.request_deadline,
        }
    }
}
