//! Translation provider trait and utilities
//!
//! `Translator` is the single capability the batch orchestrator depends on:
//! turn an ordered list of strings into the same number of strings in the
//! target language, or fail.
//!
//! # Example
//!
//! ```ignore
//! use locrisk_mt::{EchoTranslator, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EchoTranslator::default();
//!     let texts = vec!["Hello".to_string(), "Goodbye".to_string()];
//!     let results = provider.translate(&texts, "fr-FR", None).await?;
//!     assert_eq!(results, vec!["[fr-FR] Hello", "[fr-FR] Goodbye"]);
//!     Ok(())
//! }
//! ```

use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;

/// Generic trait for translation backends
///
/// Implementations handle the actual translation work, whether through an
/// API (hosted or local chat completion, a remote translation service) or
/// deterministic logic (echo).
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `texts` into `target_lang`
    ///
    /// # Arguments
    ///
    /// * `texts` - Strings to translate, in order
    /// * `target_lang` - Target locale code (e.g., "de-DE")
    /// * `context` - Optional free-text guidance for the translator
    ///
    /// # Guarantees
    ///
    /// - Output order matches input order
    /// - Output never holds more items than the input
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        context: Option<&str>,
    ) -> ProviderResult<Vec<String>>;

    /// Name of this provider, used in logs
    fn provider_name(&self) -> &str;
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores.
pub fn validate_locale(locale: &str) -> ProviderResult<()> {
    if locale.is_empty() {
        return Err(ProviderError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ProviderError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
