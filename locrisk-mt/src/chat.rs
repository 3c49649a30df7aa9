//! Minimal client for OpenAI-compatible `/chat/completions` endpoints.
//!
//! Shared by the hosted and the local LLM backends; they differ only in
//! endpoint, credentials, prompt and sampling settings.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};
use crate::observer::{RunObserver, tracing_observer};

/// Longest slice of an error body kept in error messages
const ERROR_SNIPPET_LEN: usize = 400;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One system + user prompt exchange
#[derive(Debug, Clone)]
pub struct ChatPrompt<'a> {
    pub system: &'a str,
    pub user: String,
    pub temperature: f32,
    /// Ask the endpoint for a JSON object response
    pub json_object: bool,
}

#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    observer: Arc<dyn RunObserver>,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Option<Duration>,
    ) -> ProviderResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ProviderError::NetworkError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            observer: tracing_observer(),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn observer(&self) -> &Arc<dyn RunObserver> {
        &self.observer
    }

    /// Send the prompt and return the first choice's message content
    pub async fn complete(&self, prompt: &ChatPrompt<'_>) -> ProviderResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            response_format: prompt.json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        self.observer.debug(None, format!("POST {} (model {})", url, self.model));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        // Read as text first so error bodies are not lost when they are not JSON
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::InvalidResponse(format!("Invalid chat completion JSON: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .finish()
    }
}

/// Pull a readable message out of an error body: `{"error": {"message"}}`,
/// `{"message"}`, `{"error": "..."}` or a truncated raw body.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("error").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_SNIPPET_LEN {
        let snippet: String = trimmed.chars().take(ERROR_SNIPPET_LEN).collect();
        format!("{}...", snippet)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nested_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "auth"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn test_extract_flat_messages() {
        assert_eq!(extract_error_message(r#"{"message": "rate limited"}"#), "rate limited");
        assert_eq!(extract_error_message(r#"{"error": "model not loaded"}"#), "model not loaded");
    }

    #[test]
    fn test_extract_raw_body_is_truncated() {
        let body = "x".repeat(1000);
        let msg = extract_error_message(&body);
        assert!(msg.ends_with("..."));
        assert_eq!(msg.len(), ERROR_SNIPPET_LEN + 3);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let client =
            ChatCompletionClient::new("http://localhost:1234/v1/", "secret-key", "m", None)
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("***"));
        assert!(!debug.contains("secret-key"));
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
    }
}
