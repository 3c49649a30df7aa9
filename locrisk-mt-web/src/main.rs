use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use locrisk_mt::observer::tracing_observer;
use locrisk_mt::{
    ErrorResponse, Provider, ProviderError, ProviderKind, ProviderSettings, TranslateResponse,
    Translator,
};

const DEFAULT_BIND: &str = "127.0.0.1:3001";

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ProviderSettings>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let settings = ProviderSettings::from_env();
    if settings.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; the openai provider will be unavailable");
    }
    let state = AppState {
        settings: Arc::new(settings),
    };

    info!("Starting locrisk translation service");

    let bind = std::env::var("LOCRISK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Server running at http://{}", bind);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate_texts))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn translation_failed(error: &ProviderError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Translation failed").with_details(error.to_string())),
    )
}

/// Optional string field; `null` counts as absent
fn optional_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field).and_then(Value::as_str)
}

async fn translate_texts(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let texts: Vec<String> = body
        .get("texts")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| bad_request("Invalid input: \"texts\" must be an array of strings."))?;

    let target_lang = optional_str(&body, "targetLang")
        .filter(|lang| !lang.trim().is_empty())
        .ok_or_else(|| bad_request("Invalid input: \"targetLang\" is required."))?;

    let provider_name = optional_str(&body, "provider").unwrap_or("mock");
    let kind = match provider_name.parse::<ProviderKind>() {
        Ok(kind) => kind,
        Err(e @ ProviderError::UnknownProvider(_)) => return Err(bad_request(e.to_string())),
        Err(e) => return Err(translation_failed(&e)),
    };

    let endpoint =
        optional_str(&body, "customEndpoint").or_else(|| optional_str(&body, "customUrl"));
    let api_key = optional_str(&body, "apiKey");
    let context = optional_str(&body, "context");

    info!(
        "Translating {} texts to {} with {}",
        texts.len(),
        target_lang,
        kind
    );

    let provider = Provider::build(kind, &state.settings, endpoint, api_key, tracing_observer())
        .map_err(|e| {
            warn!("Provider {} unavailable: {}", kind, e);
            translation_failed(&e)
        })?;

    let translations = provider
        .translate(&texts, target_lang, context)
        .await
        .map_err(|e| {
            warn!("Translation to {} failed: {}", target_lang, e);
            translation_failed(&e)
        })?;

    Ok(Json(TranslateResponse { translations }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState {
            settings: Arc::new(ProviderSettings::default()),
        })
    }

    async fn post_json(body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/translate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_mock_is_the_default_provider() {
        let (status, body) = post_json(json!({
            "texts": ["Hello", "Quit"],
            "targetLang": "ko-KR"
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "translations": ["[ko-KR] Hello", "[ko-KR] Quit"] }));
    }

    #[tokio::test]
    async fn test_texts_must_be_strings() {
        for texts in [json!("Hello"), json!([1, 2]), Value::Null] {
            let (status, body) = post_json(json!({ "texts": texts, "targetLang": "de-DE" })).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid input: \"texts\" must be an array of strings.");
        }
    }

    #[tokio::test]
    async fn test_target_lang_is_required() {
        let (status, body) = post_json(json!({ "texts": ["Hello"] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input: \"targetLang\" is required.");
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let (status, body) = post_json(json!({
            "texts": ["Hello"],
            "targetLang": "de-DE",
            "provider": "babelfish"
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown provider: babelfish");
    }

    #[tokio::test]
    async fn test_unimplemented_provider_fails_translation() {
        let (status, body) = post_json(json!({
            "texts": ["Hello"],
            "targetLang": "de-DE",
            "provider": "deepl"
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Translation failed");
        assert!(body["details"].as_str().unwrap().contains("not yet implemented"));
    }

    #[tokio::test]
    async fn test_openai_without_key() {
        let (status, body) = post_json(json!({
            "texts": ["Hello"],
            "targetLang": "de-DE",
            "provider": "openai"
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_unreachable_lmstudio_via_custom_url() {
        let (status, body) = post_json(json!({
            "texts": ["Hello"],
            "targetLang": "de-DE",
            "provider": "lmstudio",
            "customUrl": "http://127.0.0.1:9/v1"
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("127.0.0.1:9"));
    }
}
