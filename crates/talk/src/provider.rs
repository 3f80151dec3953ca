pub mod did;

use async_trait::async_trait;
use http::StatusCode;
use secrecy::SecretString;
use serde_json::Value;

use crate::types::TalkPayload;

/// Status and body of one provider call
///
/// Status interpretation is left to the orchestrator so the scheme retry and
/// error mapping live in one place.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub status: StatusCode,
    /// Parsed JSON, or the raw text as a JSON string when it is not JSON
    pub body: Value,
}

/// Trait for talk provider implementations
#[async_trait]
pub trait TalkProvider: Send + Sync {
    /// Submit a new talk
    ///
    /// Only transport failures are errors; every HTTP status is a reply.
    async fn create_talk(
        &self,
        payload: &TalkPayload<'_>,
        authorization: &SecretString,
    ) -> crate::error::Result<ProviderReply>;

    /// Fetch the status of a talk job
    async fn get_talk(&self, job_id: &str, authorization: &SecretString) -> crate::error::Result<ProviderReply>;

    /// Get the provider name
    fn name(&self) -> &str;
}
