//! Deterministic echo translator
//!
//! Simulates a translation backend without network access or API keys. The
//! default mode prefixes each text with the target code (`"[de-DE] Hello"`),
//! which the serializer strips when writing files.
//!
//! # Example
//!
//! ```ignore
//! use locrisk_mt::{EchoMode, EchoTranslator, Translator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let echo = EchoTranslator::new(EchoMode::Prefix);
//!     let result = echo.translate(&["hello".to_string()], "fr-FR", None).await.unwrap();
//!     assert_eq!(result, vec!["[fr-FR] hello"]);
//! }
//! ```

use crate::error::{ProviderError, ProviderResult};
use crate::translator::Translator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Echo behaviours for simulating different backends
#[derive(Debug, Clone, Default)]
pub enum EchoMode {
    /// Prefix with the target code: "hello" → "[fr-FR] hello"
    #[default]
    Prefix,

    /// Predefined (text, target) → translation mappings, falling back to `Prefix`
    Mappings(HashMap<(String, String), String>),

    /// Return input unchanged
    NoOp,

    /// Drop the last `n` items to simulate an undersized response
    Truncate(usize),

    /// Fail every call
    Fail(String),
}

#[derive(Debug, Clone, Default)]
pub struct EchoTranslator {
    mode: EchoMode,
    /// Simulated latency per call
    delay_ms: u64,
}

impl EchoTranslator {
    pub fn new(mode: EchoMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    /// Create an EchoTranslator with simulated network delay
    ///
    /// ```ignore
    /// let echo = EchoTranslator::with_delay(EchoMode::Prefix, 500);
    /// ```
    pub fn with_delay(mode: EchoMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn prefixed(text: &str, target: &str) -> String {
        format!("[{}] {}", target, text)
    }
}

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        _context: Option<&str>,
    ) -> ProviderResult<Vec<String>> {
        // Delay is per call, not per string
        self.apply_delay().await;

        match &self.mode {
            EchoMode::Prefix => Ok(texts
                .iter()
                .map(|text| Self::prefixed(text, target_lang))
                .collect()),
            EchoMode::Mappings(map) => Ok(texts
                .iter()
                .map(|text| {
                    map.get(&(text.clone(), target_lang.to_string()))
                        .cloned()
                        .unwrap_or_else(|| Self::prefixed(text, target_lang))
                })
                .collect()),
            EchoMode::NoOp => Ok(texts.to_vec()),
            EchoMode::Truncate(n) => {
                let keep = texts.len().saturating_sub(*n);
                Ok(texts[..keep]
                    .iter()
                    .map(|text| Self::prefixed(text, target_lang))
                    .collect())
            }
            EchoMode::Fail(msg) => Err(ProviderError::TranslationError(msg.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "Echo Translator"
    }
}
