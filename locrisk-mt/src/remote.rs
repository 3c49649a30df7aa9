//! Client for a running `locrisk-mt-web` service
//!
//! Sends each chunk to `<base>/api/translate` and lets the service pick the
//! backend named by `backend`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};
use crate::translator::{Translator, validate_locale};
use crate::wire::{ErrorResponse, TranslateRequest, TranslateResponse};

#[derive(Clone)]
pub struct RemoteTranslator {
    client: reqwest::Client,
    base_url: String,
    backend: String,
    endpoint_override: Option<String>,
    api_key: Option<String>,
}

impl RemoteTranslator {
    pub fn new(base_url: &str, backend: &str, timeout: Option<Duration>) -> ProviderResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Remote service URL is empty".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ProviderError::NetworkError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            backend: backend.to_string(),
            endpoint_override: None,
            api_key: None,
        })
    }

    /// Base URL the service should use for its local backend
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        self.endpoint_override = endpoint;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }
}

impl std::fmt::Debug for RemoteTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTranslator")
            .field("base_url", &self.base_url)
            .field("backend", &self.backend)
            .field("endpoint_override", &self.endpoint_override)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl Translator for RemoteTranslator {
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

        let request = TranslateRequest {
            texts: texts.to_vec(),
            target_lang: target_lang.to_string(),
            provider: self.backend.clone(),
            custom_endpoint: self.endpoint_override.clone(),
            context: context.map(str::to_string),
            api_key: self.api_key.clone(),
        };

        let url = format!("{}/api/translate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(ErrorResponse {
                    error,
                    details: Some(details),
                }) => format!("{}: {}", error, details),
                Ok(ErrorResponse { error, details: None }) => error,
                Err(_) => crate::chat::extract_error_message(&text),
            };
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: TranslateResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::InvalidResponse(format!("Invalid translate response: {}", e))
        })?;

        if body.translations.len() > texts.len() {
            return Err(ProviderError::InvalidResponse(format!(
                "Service returned {} translations for {} inputs",
                body.translations.len(),
                texts.len()
            )));
        }

        Ok(body.translations)
    }

    fn provider_name(&self) -> &str {
        "Remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_forwards_request_fields() {
        let app = Router::new().route(
            "/api/translate",
            post(|Json(request): Json<TranslateRequest>| async move {
                assert_eq!(request.provider, "lmstudio");
                assert_eq!(request.custom_endpoint.as_deref(), Some("http://gpu-box:1234/v1"));
                assert_eq!(request.context.as_deref(), Some("menu labels"));
                let translations = request
                    .texts
                    .iter()
                    .map(|t| format!("{}!", t))
                    .collect();
                Json(TranslateResponse { translations })
            }),
        );
        let base = serve(app).await;

        let provider = RemoteTranslator::new(&format!("{}/", base), "lmstudio", None)
            .unwrap()
            .with_endpoint_override(Some("http://gpu-box:1234/v1".to_string()));
        let result = provider
            .translate(&["Start".to_string(), "Quit".to_string()], "fr-FR", Some("menu labels"))
            .await
            .unwrap();
        assert_eq!(result, vec!["Start!", "Quit!"]);
    }

    #[tokio::test]
    async fn test_error_body_becomes_http_error() {
        let app = Router::new().route(
            "/api/translate",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Translation failed", "details": "model offline"})),
                )
            }),
        );
        let base = serve(app).await;

        let provider = RemoteTranslator::new(&base, "openai", None).unwrap();
        match provider.translate(&["Hi".to_string()], "de-DE", None).await {
            Err(ProviderError::Http { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Translation failed: model offline");
            }
            other => panic!("Expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_masks_api_key() {
        let provider = RemoteTranslator::new("http://localhost:3001", "openai", None)
            .unwrap()
            .with_api_key(Some("sk-secret".to_string()));
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("sk-secret"));
    }
}
