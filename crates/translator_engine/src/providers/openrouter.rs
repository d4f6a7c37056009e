use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use translator_core::ProviderId;
use translator_logging::tl_debug;

use super::http::{describe_status, execute, parse_body};
use super::language::translation_prompt;
use super::{RequestLimits, Translator};
use crate::{ErrorKind, TranslateError};

const LABEL: &str = "Mistral API";
const INVALID_KEY: &str =
    "Invalid OpenRouter API key. Check your key or use without one for free tier.";
const RATE_LIMITED: &str = "Mistral API rate limit exceeded. Please try again later.";
const REFERER: &str = "https://telegram-translator.extension";
const TITLE: &str = "Telegram Translator";

pub const MISTRAL_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const MISTRAL_FREE_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Mistral through the OpenRouter chat-completions API.
///
/// The key is optional; without one the free model tier is used.
#[derive(Debug, Clone)]
pub struct OpenRouterTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    limits: RequestLimits,
}

impl OpenRouterTranslator {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        limits: RequestLimits,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            limits,
        }
    }

    pub fn model(&self) -> &'static str {
        if self.api_key.is_some() {
            MISTRAL_MODEL
        } else {
            MISTRAL_FREE_MODEL
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Translator for OpenRouterTranslator {
    fn provider(&self) -> ProviderId {
        ProviderId::Mistral
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        let prompt = translation_prompt(text, target_language);
        let payload = ChatRequest {
            model: self.model(),
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: 2000,
            temperature: 0.1,
            top_p: 0.9,
        };
        let body = serde_json::to_vec(&payload).map_err(|err| {
            TranslateError::new(
                ErrorKind::Protocol,
                format!("{LABEL} request encoding failed: {err}"),
            )
        })?;

        let url = format!(
            "{}/api/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .body(body);
        if let Some(key) = self.api_key.as_deref() {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        tl_debug!("openrouter request model={}", self.model());
        let reply = execute(request, self.limits, LABEL).await?;
        if !reply.status.is_success() {
            return Err(classify_status(reply.status));
        }

        let response: ChatResponse = parse_body(&reply.body, LABEL)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
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
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TranslateError::new(ErrorKind::Auth, INVALID_KEY)
        }
        StatusCode::TOO_MANY_REQUESTS => TranslateError::new(ErrorKind::RateLimit, RATE_LIMITED),
        StatusCode::BAD_REQUEST => TranslateError::new(
            ErrorKind::Transport,
            format!("Invalid request format for {LABEL}"),
        ),
        StatusCode::SERVICE_UNAVAILABLE => TranslateError::new(
            ErrorKind::Transport,
            "Mistral service temporarily unavailable. Please try again.",
        ),
        other => TranslateError::new(
            ErrorKind::Transport,
            format!("{LABEL} error: {}", describe_status(other)),
        ),
    }
}
