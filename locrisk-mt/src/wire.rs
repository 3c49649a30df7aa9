//! JSON bodies of the `POST /api/translate` exchange.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub texts: Vec<String>,
    pub target_lang: String,
    /// Backend wire name (`mock`, `openai`, `lmstudio`)
    pub provider: String,
    #[serde(default, alias = "customUrl", skip_serializing_if = "Option::is_none")]
    pub custom_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let request = TranslateRequest {
            texts: vec!["Hello".to_string()],
            target_lang: "de-DE".to_string(),
            provider: "lmstudio".to_string(),
            custom_endpoint: Some("http://10.0.0.2:1234/v1".to_string()),
            context: None,
            api_key: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["targetLang"], "de-DE");
        assert_eq!(json["customEndpoint"], "http://10.0.0.2:1234/v1");
        assert!(json.get("context").is_none());
        assert!(json.get("apiKey").is_none());
    }

    #[test]
    fn test_custom_url_alias() {
        let request: TranslateRequest = serde_json::from_str(
            r#"{"texts": [], "targetLang": "fr-FR", "provider": "mock", "customUrl": "http://x/v1"}"#,
        )
        .unwrap();
        assert_eq!(request.custom_endpoint.as_deref(), Some("http://x/v1"));
    }

    #[test]
    fn test_error_response_details_are_optional() {
        let plain: ErrorResponse = serde_json::from_str(r#"{"error": "Unknown provider: x"}"#).unwrap();
        assert_eq!(plain.details, None);

        let json = serde_json::to_string(&ErrorResponse::new("Translation failed").with_details("boom")).unwrap();
        assert_eq!(json, r#"{"error":"Translation failed","details":"boom"}"#);
    }
}
