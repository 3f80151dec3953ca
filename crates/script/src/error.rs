use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScriptError>;

/// Failures of the chat completion call
#[derive(Debug, Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ScriptError {
    /// No API key is configured for the completion endpoint
    #[error("script generation is not configured: missing API key")]
    MissingLlmCredential,

    /// The completion endpoint answered with a non-success status
    #[error("completion endpoint returned {status}: {message}")]
    LlmHttpError { status: u16, message: String },

    /// The request could not be sent or the response could not be read
    #[error("completion request failed: {0}")]
    NetworkError(String),

    /// The completion carried no usable content
    #[error("completion returned no content")]
    LlmEmptyResponse,
}

impl ScriptError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}
