use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{LlmError, TextGenerator};
use crate::config::GeminiConfig;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// `generateContent` response, reduced to the path we read.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Single decode step from response body to the first candidate's text.
fn decode_envelope(body: &str) -> Result<String, LlmError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Envelope(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| LlmError::Envelope("no text in first candidate".into()))
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "gemini request failed");
                LlmError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(%status, body = %body, "gemini returned an error");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = decode_envelope(&body)?;
        debug!(reply_len = text.len(), "gemini replied");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_first_candidate_text() {
        let body = r#"{
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "{\"days\": []}" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second" }] } }
            ],
            "usageMetadata": { "totalTokenCount": 12 }
        }"#;
        assert_eq!(decode_envelope(body).unwrap(), r#"{"days": []}"#);
    }

    #[test]
    fn missing_text_is_one_envelope_error() {
        for body in [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
            "<html>bad gateway</html>",
        ] {
            assert!(
                matches!(decode_envelope(body), Err(LlmError::Envelope(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: "k".into(),
            model: "gemini-1.5-flash".into(),
            base_url: "https://example.test/v1beta/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_matches_api_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );
    }
}
