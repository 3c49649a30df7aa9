//! Decoding of structured translation output from chat-completion models.
//!
//! Accepted shapes, after stripping Markdown code fences:
//!
//! - `["Hallo", "Welt"]`
//! - `{"translations": ["Hallo", "Welt"]}`
//! - `{"anyKey": ["Hallo", "Welt"]}` (exactly one key)
//!
//! Anything else is an [`ProviderError::InvalidResponse`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StructuredTranslations {
    List(Vec<String>),
    Wrapped { translations: Vec<String> },
    Keyed(BTreeMap<String, Vec<String>>),
}

/// Remove ```json / ``` fences some models wrap around JSON
pub fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "").trim().to_string()
}

/// Decode model output into translations for `expected` inputs.
///
/// A result shorter than `expected` is returned as-is (the caller aligns it);
/// an empty result for non-empty input or a longer result is rejected.
pub fn decode_translations(content: &str, expected: usize) -> ProviderResult<Vec<String>> {
    let cleaned = strip_code_fences(content);
    if cleaned.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "No content received from model".to_string(),
        ));
    }

    let parsed: StructuredTranslations = serde_json::from_str(&cleaned).map_err(|_| {
        ProviderError::InvalidResponse("Model failed to return valid JSON array.".to_string())
    })?;

    let translations = match parsed {
        StructuredTranslations::List(list) => list,
        StructuredTranslations::Wrapped { translations } => translations,
        StructuredTranslations::Keyed(map) if map.len() == 1 => {
            map.into_values().next().unwrap_or_default()
        }
        StructuredTranslations::Keyed(map) => {
            return Err(ProviderError::InvalidResponse(format!(
                "Expected a JSON array of strings, got an object with {} keys",
                map.len()
            )));
        }
    };

    if expected > 0 && translations.is_empty() {
        return Err(ProviderError::InvalidResponse(format!(
            "Model returned no translations for {} inputs",
            expected
        )));
    }
    if translations.len() > expected {
        return Err(ProviderError::InvalidResponse(format!(
            "Model returned {} translations for {} inputs",
            translations.len(),
            expected
        )));
    }

    Ok(translations)
}
