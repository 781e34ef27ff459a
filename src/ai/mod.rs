//! LLM inference client for risk scoring and drug recommendation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod parser;
pub mod prompt;

/// Fixed model identifier sent with every completion request and recorded
/// alongside each prediction.
pub const GROQ_MODEL: &str = "openai/gpt-oss-20b";

const GROQ_BASE_URL: &str = "https://api.groq.com";
/// Low sampling temperature keeps the scoring output close to deterministic.
const TEMPERATURE: f64 = 0.3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("inference provider returned status {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("inference reply carried no message content")]
    EmptyReply,
}

/// HTTP client for Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GROQ_BASE_URL)
    }

    /// Point the client at a different endpoint. Tests use this to stand in
    /// a local mock for the provider.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Send a single-turn chat completion and return the assistant's reply
    /// text, trimmed.
    pub async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: GROQ_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(InferenceError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn complete_returns_trimmed_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": GROQ_MODEL,
                "temperature": 0.3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  hello  "}}]
            })))
            .mount(&server)
            .await;

        let client = GroqClient::with_base_url("test-key".into(), &server.uri());
        let reply = client.complete("prompt").await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn complete_surfaces_provider_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = GroqClient::with_base_url("test-key".into(), &server.uri());
        let err = client.complete("prompt").await.unwrap_err();
        match err {
            InferenceError::Provider { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_rejects_reply_without_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = GroqClient::with_base_url("test-key".into(), &server.uri());
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, InferenceError::EmptyReply));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = GroqClient::with_base_url("k".into(), "http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
