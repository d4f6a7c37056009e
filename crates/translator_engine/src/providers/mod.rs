//! Translation provider adapters.
//!
//! Every adapter has the same shape: `(text, target language) -> text`.
//! Provider-specific wire formats and status codes stay inside the adapter;
//! callers only see [`TranslateError`] with an [`ErrorKind`](crate::ErrorKind).

mod gemini;
mod google;
mod http;
mod language;
mod openrouter;

use std::time::Duration;

use async_trait::async_trait;
use translator_core::{ProviderId, Settings};

use crate::{ErrorKind, TranslateError};

pub use gemini::{GeminiModel, GeminiTranslator};
pub use google::GoogleTranslator;
pub use language::language_name;
pub use openrouter::{OpenRouterTranslator, MISTRAL_FREE_MODEL, MISTRAL_MODEL};

#[async_trait]
pub trait Translator: Send + Sync {
    fn provider(&self) -> ProviderId;

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// `None` waits as long as the provider takes.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub google_base_url: String,
    pub gemini_base_url: String,
    pub openrouter_base_url: String,
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            google_base_url: "https://translate.googleapis.com".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            openrouter_base_url: "https://openrouter.ai".to_string(),
            request_timeout: None,
            max_response_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ProviderSettings {
    /// Points every provider at the same base URL. Used against mock servers.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            google_base_url: base_url.clone(),
            gemini_base_url: base_url.clone(),
            openrouter_base_url: base_url,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> RequestLimits {
        RequestLimits {
            request_timeout: self.request_timeout,
            max_response_bytes: self.max_response_bytes,
        }
    }
}

/// Builds the adapter for whatever provider the settings currently select.
///
/// One HTTP client is shared by every adapter it hands out.
#[derive(Debug, Clone)]
pub struct ProviderFactory {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl ProviderFactory {
    pub fn new(settings: ProviderSettings) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().build().map_err(|err| {
            TranslateError::new(
                ErrorKind::Transport,
                format!("failed to build HTTP client: {err}"),
            )
        })?;
        Ok(Self { client, settings })
    }

    pub fn translator(&self, settings: &Settings) -> Box<dyn Translator> {
        let limits = self.settings.limits();
        let provider = settings.provider;
        let credential = settings.credential_for(provider).map(str::to_string);
        match provider {
            ProviderId::GoogleTranslate => Box::new(GoogleTranslator::new(
                self.client.clone(),
                self.settings.google_base_url.clone(),
                limits,
            )),
            ProviderId::GeminiPro | ProviderId::GeminiFlash => {
                let model = if provider == ProviderId::GeminiPro {
                    GeminiModel::Pro
                } else {
                    GeminiModel::Flash
                };
                Box::new(GeminiTranslator::new(
                    self.client.clone(),
                    self.settings.gemini_base_url.clone(),
                    model,
                    credential,
                    limits,
                ))
            }
            ProviderId::Mistral => Box::new(OpenRouterTranslator::new(
                self.client.clone(),
                self.settings.openrouter_base_url.clone(),
                credential,
                limits,
            )),
        }
    }
}
