use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SYSTEM_PROMPT: &str = "És a Alma, uma assistente simpática. Responde sempre em português de Portugal, \
     em duas ou três frases curtas, num tom caloroso e natural, adequado para ser dito em voz alta.";
const DEFAULT_FALLBACK_TEXT: &str = "Desculpa, não consegui preparar uma resposta agora. Podes repetir?";

/// Chat completion settings for turning a caller intent into spoken text
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    /// Bearer key for the completion endpoint
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// OpenAI-compatible API root (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Fixed system instruction constraining tone and language
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Spoken instead when the model returns no content
    #[serde(default = "default_fallback_text")]
    pub fallback_text: String,
    /// Timeout for each completion call
    #[serde(default = "default_request_timeout", deserialize_with = "crate::duration::deserialize")]
    pub request_timeout: Duration,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            fallback_text: default_fallback_text(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_fallback_text() -> String {
    DEFAULT_FALLBACK_TEXT.to_string()
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}
