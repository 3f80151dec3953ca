use axum::body::Body;
use serde::de::DeserializeOwned;

use crate::error::TalkError;

/// Extractor for JSON request bodies
///
/// An empty body is read as `{}` so every field falls back to its default.
pub struct ExtractPayload<T>(pub T);

/// Body limit for `/say` requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

const EMPTY_OBJECT: &[u8] = b"{}";

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = TalkError;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES)
            .await
            .map_err(|e| TalkError::InvalidBody(format!("failed to read request body (limit {BODY_LIMIT_BYTES} bytes): {e}")))?;

        let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            EMPTY_OBJECT
        } else {
            if !is_json(&parts.headers) {
                return Err(TalkError::InvalidBody(
                    "unsupported Content-Type, expected: 'Content-Type: application/json'".to_owned(),
                ));
            }

            &bytes
        };

        serde_json::from_slice::<T>(bytes)
            .map(Self)
            .map_err(|e| TalkError::InvalidBody(format!("failed to parse request body: {e}")))
    }
}

/// `application/json`, with or without parameters such as `charset`
fn is_json(headers: &http::HeaderMap) -> bool {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}
