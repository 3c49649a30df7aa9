//! Backend selection.
//!
//! [`Provider`] is a closed set of backends, each carrying its own
//! configuration, dispatched through [`Translator`]. Names on the wire and on
//! the command line map to [`ProviderKind`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::echo::{EchoMode, EchoTranslator};
use crate::error::{ProviderError, ProviderResult};
use crate::lmstudio::{DEFAULT_LM_STUDIO_URL, LmStudioTranslator};
use crate::observer::RunObserver;
use crate::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, OpenAiTranslator};
use crate::remote::RemoteTranslator;
use crate::translator::Translator;

/// Backends a translation service can run itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Echo,
    OpenAi,
    LmStudio,
}

impl ProviderKind {
    /// Wire name understood by the web service
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Echo => "mock",
            ProviderKind::OpenAi => "openai",
            ProviderKind::LmStudio => "lmstudio",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mock" | "echo" => Ok(ProviderKind::Echo),
            "openai" => Ok(ProviderKind::OpenAi),
            "lmstudio" => Ok(ProviderKind::LmStudio),
            "google" | "deepl" => Err(ProviderError::NotConfigured(format!(
                "Provider '{}' is not yet implemented",
                name.trim()
            ))),
            _ => Err(ProviderError::UnknownProvider(name.to_string())),
        }
    }
}

/// Environment-driven backend configuration
#[derive(Clone)]
pub struct ProviderSettings {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub lm_studio_url: String,
    pub echo_delay_ms: u64,
    /// Per-request HTTP timeout; none by default
    pub timeout: Option<Duration>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            lm_studio_url: DEFAULT_LM_STUDIO_URL.to_string(),
            echo_delay_ms: 0,
            timeout: None,
        }
    }
}

impl ProviderSettings {
    /// Read `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`,
    /// `LM_STUDIO_URL` and `LOCRISK_ECHO_DELAY_MS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ProviderSettings::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        ProviderSettings {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: non_empty("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            lm_studio_url: non_empty("LM_STUDIO_URL").unwrap_or(defaults.lm_studio_url),
            echo_delay_ms: non_empty("LOCRISK_ECHO_DELAY_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.echo_delay_ms),
            timeout: defaults.timeout,
        }
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("lm_studio_url", &self.lm_studio_url)
            .field("echo_delay_ms", &self.echo_delay_ms)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Provider {
    Echo(EchoTranslator),
    OpenAi(OpenAiTranslator),
    LmStudio(LmStudioTranslator),
    Remote(RemoteTranslator),
}

impl Provider {
    /// Build a backend the current process runs itself.
    ///
    /// `endpoint_override` replaces the local backend's base URL and
    /// `api_key_override` the hosted backend's key; both are ignored by the
    /// other kinds.
    pub fn build(
        kind: ProviderKind,
        settings: &ProviderSettings,
        endpoint_override: Option<&str>,
        api_key_override: Option<&str>,
        observer: Arc<dyn RunObserver>,
    ) -> ProviderResult<Self> {
        let provider = match kind {
            ProviderKind::Echo => Provider::Echo(EchoTranslator::with_delay(
                EchoMode::Prefix,
                settings.echo_delay_ms,
            )),
            ProviderKind::OpenAi => {
                let api_key = api_key_override
                    .filter(|key| !key.trim().is_empty())
                    .or(settings.openai_api_key.as_deref())
                    .unwrap_or_default();
                Provider::OpenAi(
                    OpenAiTranslator::new(
                        api_key,
                        &settings.openai_model,
                        &settings.openai_base_url,
                        settings.timeout,
                    )?
                    .with_observer(observer),
                )
            }
            ProviderKind::LmStudio => {
                let url = endpoint_override
                    .filter(|url| !url.trim().is_empty())
                    .unwrap_or(settings.lm_studio_url.as_str());
                Provider::LmStudio(
                    LmStudioTranslator::new(url, settings.timeout)?.with_observer(observer),
                )
            }
        };
        Ok(provider)
    }

    /// Client for a `locrisk-mt-web` service at `base_url` running `backend`
    pub fn remote(
        base_url: &str,
        backend: ProviderKind,
        settings: &ProviderSettings,
        endpoint_override: Option<String>,
        api_key: Option<String>,
    ) -> ProviderResult<Self> {
        Ok(Provider::Remote(
            RemoteTranslator::new(base_url, backend.as_str(), settings.timeout)?
                .with_endpoint_override(endpoint_override)
                .with_api_key(api_key),
        ))
    }

    fn inner(&self) -> &dyn Translator {
        match self {
            Provider::Echo(p) => p,
            Provider::OpenAi(p) => p,
            Provider::LmStudio(p) => p,
            Provider::Remote(p) => p,
        }
    }
}

#[async_trait]
impl Translator for Provider {
    async fn translate(
        &self,
        texts: &[String],
        target_lang: &str,
        context: Option<&str>,
    ) -> ProviderResult<Vec<String>> {
        self.inner().translate(texts, target_lang, context).await
    }

    fn provider_name(&self) -> &str {
        self.inner().provider_name()
    }
}
