use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.d-id.com";
const DEFAULT_VOICE_ID: &str = "pt-PT-FernandaNeural";
const DEFAULT_TEXT: &str = "Olá! Sou a Alma. Em que posso ajudar?";

/// Video synthesis provider configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TalkConfig {
    /// Provider credential, either a bare key or a value already prefixed
    /// with `Basic ` or `Bearer `
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Provider API root
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Default avatar image, used when the caller sends none
    #[serde(default)]
    pub image_url: String,
    /// Default voice, used when the caller sends none
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    /// Speech engine the voice belongs to
    #[serde(default)]
    pub voice_provider: VoiceProviderType,
    /// Spoken text when the caller sends neither text nor prompt
    #[serde(default = "default_text")]
    pub default_text: String,
    /// Ask the provider to hold the response until the video is rendered
    #[serde(default = "default_wait")]
    pub wait_for_completion: bool,
    /// Timeout for each outbound provider call
    #[serde(default = "default_request_timeout", deserialize_with = "crate::duration::deserialize")]
    pub request_timeout: Duration,
    /// Job-status polling settings
    #[serde(default)]
    pub poll: PollConfig,
}

impl Default for TalkConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            image_url: String::new(),
            voice_id: default_voice_id(),
            voice_provider: VoiceProviderType::default(),
            default_text: default_text(),
            wait_for_completion: default_wait(),
            request_timeout: default_request_timeout(),
            poll: PollConfig::default(),
        }
    }
}

/// Speech engines supported for talk scripts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceProviderType {
    /// Microsoft Azure neural voices
    #[default]
    Microsoft,
}

/// Bounded polling of an asynchronous talk job
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Maximum number of status requests
    #[serde(default = "default_poll_attempts")]
    pub attempts: u32,
    /// Delay before each status request
    #[serde(default = "default_poll_interval", deserialize_with = "crate::duration::deserialize")]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: default_poll_attempts(),
            interval: default_poll_interval(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_wait() -> bool {
    true
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(90)
}

const fn default_poll_attempts() -> u32 {
    20
}

const fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

impl TalkConfig {
    /// Settings that must be present before a talk can be requested with
    /// caller defaults, by their configuration key
    pub fn missing_settings(&self) -> Vec<&'static str> {
        use secrecy::ExposeSecret;

        let mut missing = Vec::new();

        if self.api_key.as_ref().is_none_or(|key| key.expose_secret().trim().is_empty()) {
            missing.push("talk.api_key");
        }

        if self.image_url.trim().is_empty() {
            missing.push("talk.image_url");
        }

        if self.voice_id.trim().is_empty() {
            missing.push("talk.voice_id");
        }

        missing
    }
}
