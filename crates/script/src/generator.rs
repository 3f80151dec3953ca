use std::time::Duration;

use almabody_config::ScriptConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    TextGenerator,
    error::{Result, ScriptError},
    http_client::http_client,
    protocol::{ChatMessage, ChatRequest, ChatResponse},
};

/// OpenAI-compatible chat completion client producing avatar scripts
pub struct ScriptGenerator {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    model: String,
    system_prompt: String,
    fallback_text: String,
    request_timeout: Duration,
}

impl ScriptGenerator {
    pub fn from_config(config: &ScriptConfig) -> Self {
        // Blank keys come from unset environment variables with an empty default
        let api_key = config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::from(key.to_owned()));

        Self {
            client: http_client(),
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            fallback_text: config.fallback_text.clone(),
            request_timeout: config.request_timeout,
        }
    }

    /// Whether a credential is available for completion calls
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    async fn complete(&self, api_key: &SecretString, intent: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: intent,
                },
            ],
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, error = %e, "completion request failed");
                ScriptError::NetworkError(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(model = %self.model, status = %status, "completion endpoint returned error");

            return Err(ScriptError::LlmHttpError {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            tracing::warn!(model = %self.model, error = %e, "unreadable completion response");
            ScriptError::NetworkError(format!("unreadable completion response: {e}"))
        })?;

        completion
            .first_content()
            .map(str::to_owned)
            .ok_or(ScriptError::LlmEmptyResponse)
    }
}

#[async_trait]
impl TextGenerator for ScriptGenerator {
    async fn generate_text(&self, intent: &str) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or(ScriptError::MissingLlmCredential)?;

        tracing::debug!(model = %self.model, intent_len = intent.len(), "generating script");

        match self.complete(api_key, intent).await {
            Ok(text) => {
                tracing::debug!(model = %self.model, text_len = text.len(), "script generated");
                Ok(text)
            }
            Err(ScriptError::LlmEmptyResponse) => {
                tracing::warn!(model = %self.model, "completion was empty, using fallback text");
                Ok(self.fallback_text.clone())
            }
            Err(e) => Err(e),
        }
    }
}
