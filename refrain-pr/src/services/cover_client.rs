//! Cover-image endpoint client
//!
//! Sends the chosen playlist name as an image-generation prompt and decodes
//! the base64 payload from the response. Every invocation is a fresh call:
//! no caching, no retry.

use crate::models::CoverImage;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use refrain_common::FetchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = "Refrain/0.1.0 (https://github.com/refrain/refrain)";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Image generation request body: `{"prompt": "<name>"}`
#[derive(Debug, Serialize)]
struct CoverRequest<'a> {
    prompt: &'a str,
}

/// Image generation response body; the image arrives base64-encoded under
/// `result`.
#[derive(Debug, Deserialize)]
struct CoverResponse {
    result: Option<String>,
}

/// Client for the hosted image-generation endpoint
pub struct CoverClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl CoverClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::transport(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }

    /// Generate cover art for a chosen playlist name.
    ///
    /// Non-200 → `Transport` with the status; missing or undecodable
    /// base64 payload → `Malformed`.
    pub async fn fetch_cover(&self, name: &str) -> Result<CoverImage, FetchError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&CoverRequest { prompt: name })
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), error_text));
        }

        let body: CoverResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(format!("Cover JSON decode failed: {}", e)))?;

        let bytes = decode_cover_payload(body.result.as_deref())?;

        tracing::info!(caption = %name, bytes = bytes.len(), "Cover image generated");

        Ok(CoverImage {
            bytes,
            caption: name.to_string(),
        })
    }
}

/// Decode the base64 image field from a 200 response.
///
/// An absent field means the endpoint produced no image; that is a
/// malformed response, not a crash and not a transport failure.
fn decode_cover_payload(payload: Option<&str>) -> Result<Vec<u8>, FetchError> {
    let encoded = payload.ok_or_else(|| {
        FetchError::Malformed("No image was generated (missing result field)".to_string())
    })?;

    BASE64
        .decode(encoded.trim())
        .map_err(|e| FetchError::Malformed(format!("Image base64 decode failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_base64_payload() {
        let encoded = BASE64.encode(b"\x89PNG fake image bytes");
        let bytes = decode_cover_payload(Some(&encoded)).unwrap();
        assert_eq!(bytes, b"\x89PNG fake image bytes");
    }

    #[test]
    fn missing_result_field_is_malformed() {
        let err = decode_cover_payload(None).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
        assert!(err.to_string().contains("No image was generated"));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let err = decode_cover_payload(Some("not//valid==base64!!")).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn response_body_tolerates_missing_field() {
        let body: CoverResponse = serde_json::from_str("{}").unwrap();
        assert!(body.result.is_none());

        let body: CoverResponse =
            serde_json::from_str(r#"{"result": "aGVsbG8="}"#).unwrap();
        assert_eq!(decode_cover_payload(body.result.as_deref()).unwrap(), b"hello");
    }
}
