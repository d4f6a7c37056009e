use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use translator_core::ProviderId;
use translator_logging::{mask_secret, tl_debug};

use super::http::{describe_status, execute, parse_body};
use super::language::translation_prompt;
use super::{RequestLimits, Translator};
use crate::{ErrorKind, TranslateError};

const LABEL: &str = "Gemini API";
const MISSING_KEY: &str =
    "Gemini API key not found. Please add your API key in the extension settings.";
const INVALID_KEY: &str =
    "Invalid Gemini API Key. Please check your API key in extension settings.";
const ACCESS_DENIED: &str = "Gemini API access denied. Please check your API key permissions.";
const QUOTA_EXCEEDED: &str = "Gemini API quota exceeded. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeminiModel {
    Pro,
    Flash,
}

impl GeminiModel {
    pub fn model_name(self) -> &'static str {
        match self {
            GeminiModel::Pro => "gemini-2.5-pro",
            GeminiModel::Flash => "gemini-2.0-flash",
        }
    }

    fn provider(self) -> ProviderId {
        match self {
            GeminiModel::Pro => ProviderId::GeminiPro,
            GeminiModel::Flash => ProviderId::GeminiFlash,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiTranslator {
    client: reqwest::Client,
    base_url: String,
    model: GeminiModel,
    api_key: Option<String>,
    limits: RequestLimits,
}

impl GeminiTranslator {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: GeminiModel,
        api_key: Option<String>,
        limits: RequestLimits,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model,
            api_key,
            limits,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 2000,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    fn provider(&self) -> ProviderId {
        self.model.provider()
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(TranslateError::new(ErrorKind::Configuration, MISSING_KEY));
        };

        let prompt = translation_prompt(text, target_language);
        let payload = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig::default(),
        };
        let body = serde_json::to_vec(&payload).map_err(|err| {
            TranslateError::new(
                ErrorKind::Protocol,
                format!("{LABEL} request encoding failed: {err}"),
            )
        })?;

        let mut url = reqwest::Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.model_name()
        ))
        .map_err(|err| {
            TranslateError::new(ErrorKind::Transport, format!("{LABEL} endpoint invalid: {err}"))
        })?;
        url.query_pairs_mut().append_pair("key", api_key);

        tl_debug!(
            "gemini request model={} key={}",
            self.model.model_name(),
            mask_secret(api_key)
        );

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let reply = execute(request, self.limits, LABEL).await?;

        if !reply.status.is_success() {
            return Err(classify_status(reply.status));
        }

        let response: GenerateResponse = parse_body(&reply.body, LABEL)?;
        response
            .first_text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                TranslateError::new(
                    ErrorKind::Protocol,
                    format!("Unexpected response format from {LABEL}"),
                )
            })
    }
}

fn classify_status(status: StatusCode) -> TranslateError {
    match status {
        // Gemini reports a malformed or unknown key as 400.
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            TranslateError::new(ErrorKind::Auth, INVALID_KEY)
        }
        StatusCode::FORBIDDEN => TranslateError::new(ErrorKind::Auth, ACCESS_DENIED),
        StatusCode::TOO_MANY_REQUESTS => TranslateError::new(ErrorKind::RateLimit, QUOTA_EXCEEDED),
        other => TranslateError::new(
            ErrorKind::Transport,
            format!("{LABEL} error: {}", describe_status(other)),
        ),
    }
}
