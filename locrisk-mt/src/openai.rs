//! Hosted chat-completion backend (OpenAI API)
//!
//! # Authentication
//!
//! The API key comes from `OPENAI_API_KEY` (see [`ProviderSettings`]) or a
//! per-request override. The model defaults to `gpt-3.5-turbo` and can be
//! changed with `OPENAI_MODEL`.
//!
//! [`ProviderSettings`]: crate::provider::ProviderSettings

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::chat::{ChatCompletionClient, ChatPrompt};
use crate::error::{ProviderError, ProviderResult};
use crate::observer::RunObserver;
use crate::response::decode_translations;
use crate::translator::{Translator, validate_locale};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = "You are a helpful translator. You must return valid JSON.";

#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    chat: ChatCompletionClient,
}

impl OpenAiTranslator {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> ProviderResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Provider 'openai' is not configured (Missing OPENAI_API_KEY).".to_string(),
            ));
        }
        Ok(Self {
            chat: ChatCompletionClient::new(base_url, api_key, model, timeout)?,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.chat = self.chat.with_observer(observer);
        self
    }

    fn build_prompt(texts: &[String], target_lang: &str, context: Option<&str>) -> ProviderResult<String> {
        let mut prompt = format!(
            "Translate the following texts to {}. Return a JSON object of the form {{\"translations\": [...]}} with exactly {} strings. Maintain the original order.",
            target_lang,
            texts.len()
        );
        if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
            prompt.push_str(&format!("\n\nContext: {}", context));
        }
        let source = serde_json::to_string(texts)
            .map_err(|e| ProviderError::TranslationError(e.to_string()))?;
        prompt.push_str(&format!("\n\n{}", source));
        Ok(prompt)
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
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

        let prompt = ChatPrompt {
            system: SYSTEM_PROMPT,
            user: Self::build_prompt(texts, target_lang, context)?,
            temperature: 0.3,
            json_object: true,
        };

        let content = self.chat.complete(&prompt).await.map_err(|e| match e {
            ProviderError::Http { status, message } => ProviderError::Http {
                status,
                message: format!("OpenAI Error: {}", message),
            },
            other => other,
        })?;

        decode_translations(&content, texts.len())
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
