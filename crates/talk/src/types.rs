use almabody_config::VoiceProviderType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    error::{Result, TalkError},
    scheme::AuthScheme,
};

/// Inbound `/say` body; absent fields fall back to configured defaults
#[derive(Debug, Default, Deserialize)]
pub struct SayRequest {
    /// Text to speak verbatim
    #[serde(default)]
    pub text: Option<String>,
    /// Avatar image override
    #[serde(default)]
    pub image_url: Option<String>,
    /// Voice override
    #[serde(default)]
    pub voice_id: Option<String>,
    /// Intent to turn into text with the script generator when `text` is absent
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Speech engine of a voice, as named by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceProvider {
    Microsoft,
}

impl From<VoiceProviderType> for VoiceProvider {
    fn from(value: VoiceProviderType) -> Self {
        match value {
            VoiceProviderType::Microsoft => Self::Microsoft,
        }
    }
}

/// Fully resolved talk to synthesize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkRequest {
    pub text: String,
    pub image_url: String,
    pub voice_id: String,
    pub provider: VoiceProvider,
}

impl TalkRequest {
    /// Check the request can be sent, without contacting the provider
    ///
    /// # Errors
    ///
    /// [`TalkError::EmptyText`], [`TalkError::MissingImageUrl`] or
    /// [`TalkError::InvalidImageUrl`].
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(TalkError::EmptyText);
        }

        let image_url = self.image_url.trim();

        if image_url.is_empty() {
            return Err(TalkError::MissingImageUrl);
        }

        let parsed = Url::parse(image_url).map_err(|e| TalkError::InvalidImageUrl(format!("{image_url}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TalkError::InvalidImageUrl(format!(
                "{image_url}: the provider can only fetch http(s) images"
            )));
        }

        Ok(())
    }
}

/// Body of the talk-creation call
#[derive(Debug, Serialize)]
pub struct TalkPayload<'a> {
    pub source_url: &'a str,
    pub script: ScriptBlock<'a>,
}

#[derive(Debug, Serialize)]
pub struct ScriptBlock<'a> {
    #[serde(rename = "type")]
    pub script_type: &'static str,
    pub input: &'a str,
    pub provider: VoiceBlock<'a>,
}

#[derive(Debug, Serialize)]
pub struct VoiceBlock<'a> {
    #[serde(rename = "type")]
    pub provider_type: VoiceProvider,
    pub voice_id: &'a str,
}

impl<'a> From<&'a TalkRequest> for TalkPayload<'a> {
    fn from(request: &'a TalkRequest) -> Self {
        Self {
            source_url: request.image_url.trim(),
            script: ScriptBlock {
                script_type: "text",
                input: &request.text,
                provider: VoiceBlock {
                    provider_type: request.provider,
                    voice_id: &request.voice_id,
                },
            },
        }
    }
}

/// Outcome of a talk submission
#[derive(Debug, Clone)]
pub struct TalkResult {
    pub video_url: Option<String>,
    pub job_id: Option<String>,
    /// Last provider body seen
    pub raw: Value,
    pub scheme_used: AuthScheme,
    /// Status checks performed before the video was found
    pub poll_attempts: u32,
}

impl TalkResult {
    /// Only a non-empty video URL counts as success
    pub fn is_success(&self) -> bool {
        self.video_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// `/say` response body
#[derive(Debug, Default, Serialize)]
pub struct SayResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<AuthScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl SayResponse {
    pub fn success(result: TalkResult, answer: Option<String>) -> Self {
        Self {
            ok: result.is_success(),
            video_url: result.video_url,
            answer,
            job_id: result.job_id,
            scheme: Some(result.scheme_used),
            raw: Some(result.raw),
            ..Self::default()
        }
    }

    pub fn failure(error: &TalkError, answer: Option<String>) -> Self {
        Self {
            ok: false,
            answer,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
            raw: error.raw().cloned(),
            ..Self::default()
        }
    }
}
