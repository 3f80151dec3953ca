use std::time::Duration;

use almabody_config::TalkConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use super::{ProviderReply, TalkProvider};
use crate::{
    error::{Result, TalkError},
    extract::truncate_for_log,
    http_client::http_client,
    types::TalkPayload,
};

/// Characters of each provider body kept in log records
const LOGGED_BODY_CHARS: usize = 300;

/// D-ID talks API client
pub struct DidProvider {
    client: Client,
    base_url: Url,
    wait_for_completion: bool,
    request_timeout: Duration,
}

impl DidProvider {
    pub fn from_config(config: &TalkConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.base_url.clone(),
            wait_for_completion: config.wait_for_completion,
            request_timeout: config.request_timeout,
        }
    }

    fn talks_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/talks")
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<ProviderReply> {
        let response = request
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(provider = self.name(), operation, error = %e, "D-ID request failed");
                TalkError::NetworkError(format!("Failed to send request to D-ID: {e}"))
            })?;

        let status = response.status();

        let text = response.text().await.map_err(|e| {
            tracing::error!(provider = self.name(), operation, error = %e, "failed to read D-ID response body");
            TalkError::NetworkError(format!("Failed to read D-ID response: {e}"))
        })?;

        tracing::info!(
            provider = self.name(),
            operation,
            status = status.as_u16(),
            body = truncate_for_log(&text, LOGGED_BODY_CHARS),
            "D-ID call completed"
        );

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(ProviderReply { status, body })
    }
}

#[async_trait]
impl TalkProvider for DidProvider {
    async fn create_talk(&self, payload: &TalkPayload<'_>, authorization: &SecretString) -> Result<ProviderReply> {
        let mut request = self
            .client
            .post(self.talks_url())
            .header(http::header::AUTHORIZATION, authorization.expose_secret())
            .json(payload);

        if self.wait_for_completion {
            request = request.query(&[("wait", "true")]);
        }

        tracing::debug!(
            provider = self.name(),
            voice_id = payload.script.provider.voice_id,
            input_len = payload.script.input.len(),
            "creating talk"
        );

        self.send("create_talk", request).await
    }

    async fn get_talk(&self, job_id: &str, authorization: &SecretString) -> Result<ProviderReply> {
        let mut url = Url::parse(&self.talks_url()).map_err(|e| TalkError::NetworkError(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|()| TalkError::NetworkError("D-ID base URL cannot carry a path".to_owned()))?
            .push(job_id);

        let request = self
            .client
            .get(url)
            .header(http::header::AUTHORIZATION, authorization.expose_secret());

        self.send("get_talk", request).await
    }

    fn name(&self) -> &str {
        "d-id"
    }
}
