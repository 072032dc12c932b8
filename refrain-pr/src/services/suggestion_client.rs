//! Name-suggestion endpoint client
//!
//! Sends the built prompt plus a fixed music-expert system instruction to
//! a hosted text-generation endpoint and parses the raw response into a
//! `SuggestionSet`. Parsing is fail-closed: unless all three names decode,
//! the whole call fails with `Malformed`. One attempt per call, no retry.

use crate::models::SuggestionSet;
use refrain_common::FetchError;
use serde::Serialize;
use std::time::Duration;

const USER_AGENT: &str = "Refrain/0.1.0 (https://github.com/refrain/refrain)";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_TOKENS: u32 = 256;
const TEMPERATURE: f32 = 0.9;

const SYSTEM_PROMPT: &str = "You are a seasoned expert in the music industry, deeply \
knowledgeable about all genres of music. Your role is to provide thoughtful, accurate, and \
creative advice and answers related to music. You approach every inquiry with a passion for \
music, creativity, and a dedication to enriching the musical knowledge and experience of your \
audience.";

/// Chat message in the generation request body
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Generation request body:
/// `{stream, messages, max_tokens, temperature}`
#[derive(Debug, Serialize)]
struct GenerationRequest {
    stream: bool,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Client for the hosted name-generation endpoint
pub struct SuggestionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SuggestionClient {
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

    /// Fetch exactly three name suggestions for a prompt.
    ///
    /// Non-2xx status → `Transport` (with the status code); undecodable or
    /// incomplete response text → `Malformed`.
    pub async fn fetch_suggestions(&self, prompt: &str) -> Result<SuggestionSet, FetchError> {
        let request_body = GenerationRequest {
            stream: false,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), error_text));
        }

        let raw_text = response
            .text()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), bytes = raw_text.len(), "Generation response received");

        parse_suggestions(&raw_text)
    }
}

/// Strip leading/trailing Markdown code-fence markers the model may wrap
/// its JSON in (```json ... ```).
fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    for opener in ["```json", "```"] {
        if let Some(rest) = cleaned.strip_prefix(opener) {
            cleaned = rest;
            break;
        }
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Parse raw generation output into a `SuggestionSet`.
///
/// Strict: the cleaned text must be a JSON object carrying all three
/// `playlist_name_*` keys. A partially valid response (2 of 3 names) is a
/// total failure, never surfaced as a trimmed result.
pub fn parse_suggestions(raw_text: &str) -> Result<SuggestionSet, FetchError> {
    let cleaned = strip_code_fences(raw_text);

    if cleaned.is_empty() {
        return Err(FetchError::Malformed(
            "Generation response was empty".to_string(),
        ));
    }

    serde_json::from_str::<SuggestionSet>(cleaned)
        .map_err(|e| FetchError::Malformed(format!("Suggestion JSON decode failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let set = parse_suggestions(
            r#"{"playlist_name_1": "Dusk Drive", "playlist_name_2": "Neon Roads", "playlist_name_3": "Midnight Mixtape"}"#,
        )
        .unwrap();
        assert_eq!(
            set.options(),
            ["Dusk Drive", "Neon Roads", "Midnight Mixtape"]
        );
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"playlist_name_1\": \"a\", \"playlist_name_2\": \"b\", \"playlist_name_3\": \"c\"}\n```";
        let set = parse_suggestions(raw).unwrap();
        assert_eq!(set.options(), ["a", "b", "c"]);
    }

    #[test]
    fn parses_bare_fence_markers() {
        let raw = "```\n{\"playlist_name_1\": \"a\", \"playlist_name_2\": \"b\", \"playlist_name_3\": \"c\"}\n```";
        let set = parse_suggestions(raw).unwrap();
        assert_eq!(set.options(), ["a", "b", "c"]);
    }

    #[test]
    fn missing_key_fails_closed() {
        let raw = r#"{"playlist_name_1": "a", "playlist_name_2": "b"}"#;
        let err = parse_suggestions(raw).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn commentary_around_json_is_malformed() {
        let raw = "Sure! Here are some names: {\"playlist_name_1\": \"a\", \"playlist_name_2\": \"b\", \"playlist_name_3\": \"c\"}";
        assert!(matches!(
            parse_suggestions(raw),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn empty_and_whitespace_responses_are_malformed() {
        assert!(matches!(parse_suggestions(""), Err(FetchError::Malformed(_))));
        assert!(matches!(
            parse_suggestions("  \n\t "),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            parse_suggestions("```json\n```"),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn values_are_order_preserving() {
        let set = parse_suggestions(
            r#"{"playlist_name_3": "three", "playlist_name_1": "one", "playlist_name_2": "two"}"#,
        )
        .unwrap();
        // Keyed fields, not positional: key order in the response is irrelevant
        assert_eq!(set.options(), ["one", "two", "three"]);
    }

    #[test]
    fn request_body_serializes_expected_shape() {
        let body = GenerationRequest {
            stream: false,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".to_string(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["max_tokens"], 256);
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
