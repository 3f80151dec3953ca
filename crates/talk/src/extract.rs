//! Normalization of provider response bodies
//!
//! The provider has returned the finished video under several field names
//! over time, so bodies are read as untyped JSON.

use serde_json::Value;

/// Field names that may hold the finished video, highest priority first
pub const VIDEO_URL_FIELDS: &[&str] = &["result_url", "video_url", "video", "url"];

/// Field holding the asynchronous job identifier
pub const JOB_ID_FIELD: &str = "id";

/// Field holding the job lifecycle status
const STATUS_FIELD: &str = "status";

/// First non-empty string among [`VIDEO_URL_FIELDS`]
pub fn extract_video_url(body: &Value) -> Option<&str> {
    VIDEO_URL_FIELDS
        .iter()
        .find_map(|field| non_empty_str(body, field))
}

/// Job identifier, if present and non-empty
pub fn extract_job_id(body: &Value) -> Option<&str> {
    non_empty_str(body, JOB_ID_FIELD)
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Lifecycle of a talk job as reported by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// `created`, `started`, or any status not listed below
    Pending,
    /// `done`
    Done,
    /// `error` or `rejected`
    Failed,
}

impl JobStatus {
    pub fn from_body(body: &Value) -> Self {
        match body.get(STATUS_FIELD).and_then(Value::as_str) {
            Some(status) if status.eq_ignore_ascii_case("done") => Self::Done,
            Some(status) if status.eq_ignore_ascii_case("error") || status.eq_ignore_ascii_case("rejected") => {
                Self::Failed
            }
            _ => Self::Pending,
        }
    }
}

/// Shorten a provider body for log records
pub fn truncate_for_log(body: &str, max_chars: usize) -> &str {
    body.char_indices()
        .nth(max_chars)
        .map_or(body, |(end, _)| &body[..end])
}
