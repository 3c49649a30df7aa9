//! Local chat-completion backend (LM Studio or any OpenAI-compatible local server)
//!
//! The base URL is chosen from, in order: a per-request endpoint override,
//! `LM_STUDIO_URL`, and `http://localhost:1234/v1`. Local servers ignore the
//! model name and the API key, but both are sent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::chat::{ChatCompletionClient, ChatPrompt};
use crate::error::{ProviderError, ProviderResult};
use crate::observer::RunObserver;
use crate::response::decode_translations;
use crate::translator::{Translator, validate_locale};

pub const DEFAULT_LM_STUDIO_URL: &str = "http://localhost:1234/v1";

const LOCAL_MODEL: &str = "local-model";
const LOCAL_API_KEY: &str = "lm-studio";
const SYSTEM_PROMPT: &str =
    "You are a helpful translator. RESTRICTION: output strictly valid JSON array. Length MUST match input.";

#[derive(Debug, Clone)]
pub struct LmStudioTranslator {
    chat: ChatCompletionClient,
}

impl LmStudioTranslator {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ProviderResult<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(ProviderError::NotConfigured(
                "LM Studio URL is empty".to_string(),
            ));
        }
        Ok(Self {
            chat: ChatCompletionClient::new(base_url, LOCAL_API_KEY, LOCAL_MODEL, timeout)?,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.chat = self.chat.with_observer(observer);
        self
    }

    pub fn base_url(&self) -> &str {
        self.chat.base_url()
    }

    fn build_prompt(texts: &[String], target_lang: &str, context: Option<&str>) -> ProviderResult<String> {
        let mut prompt = format!(
            "You are a professional translator. Translate the following array of texts into {}.\n\
             Return ONLY a raw JSON array of strings.\n\
             IMPORTANT: The output array MUST have exactly the same number of items as the input array.\n\
             Translate every single item, even if it looks like a symbol or code. Do not skip any items.\n\
             Do not include markdown formatting or keys like \"translations\".",
            target_lang
        );
        if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
            prompt.push_str(&format!("\n\nContext for translation: {}", context));
        }
        let source = serde_json::to_string(texts)
            .map_err(|e| ProviderError::TranslationError(e.to_string()))?;
        prompt.push_str(&format!(
            "\n\nSource Texts ({} items):\n{}",
            texts.len(),
            source
        ));
        Ok(prompt)
    }
}

#[async_trait]
impl Translator for LmStudioTranslator {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        context: Option<&str>,
    ) -> ProviderResult<Vec<String>> {
        validate_locale(target_lang)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.chat.observer().info(
            Some(target_lang),
            format!("Connecting to LM Studio at: {}", self.base_url()),
        );

        let prompt = ChatPrompt {
            system: SYSTEM_PROMPT,
            user: Self::build_prompt(texts, target_lang, context)?,
            temperature: 0.1,
            json_object: false,
        };

        let content = self.chat.complete(&prompt).await.map_err(|e| match e {
            ProviderError::NetworkError(_) => ProviderError::NetworkError(format!(
                "Cannot connect to LM Studio at \"{}\". Make sure LM Studio is running and the server is started.",
                self.base_url()
            )),
            other => other,
        })?;

        decode_translations(&content, texts.len())
    }

    fn provider_name(&self) -> &str {
        "LM Studio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use serde_json::{Value, json};

    /// Serve a fixed chat-completion `content` on an ephemeral port, returns the base URL
    async fn fake_server(content: &'static str) -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(body): Json<Value>| async move {
                assert_eq!(body["model"], LOCAL_MODEL);
                assert_eq!(body["messages"][0]["role"], "system");
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": content } }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_translates_fenced_array() {
        let url = fake_server("```json\n[\"Hallo\", \"Tschüss\"]\n```").await;
        let provider = LmStudioTranslator::new(&url, None).unwrap();
        let result = provider
            .translate(&texts(&["Hello", "Bye"]), "de-DE", Some("casual"))
            .await
            .unwrap();
        assert_eq!(result, vec!["Hallo", "Tschüss"]);
    }

    #[tokio::test]
    async fn test_rejects_prose_response() {
        let url = fake_server("I cannot do that").await;
        let provider = LmStudioTranslator::new(&url, None).unwrap();
        let result = provider.translate(&texts(&["Hello"]), "de-DE", None).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) is closed on test machines
        let provider = LmStudioTranslator::new("http://127.0.0.1:9/v1", None).unwrap();
        match provider.translate(&texts(&["Hello"]), "de-DE", None).await {
            Err(ProviderError::NetworkError(msg)) => assert!(msg.contains("Cannot connect to LM Studio")),
            other => panic!("Expected NetworkError, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_mentions_item_count() {
        let prompt = LmStudioTranslator::build_prompt(&texts(&["a", "b", "c"]), "ja-JP", None).unwrap();
        assert!(prompt.contains("into ja-JP"));
        assert!(prompt.contains("Source Texts (3 items):\n[\"a\",\"b\",\"c\"]"));
    }

    #[test]
    fn test_empty_url_is_not_configured() {
        assert!(matches!(
            LmStudioTranslator::new(" ", None),
            Err(ProviderError::NotConfigured(_))
        ));
    }
}
