use async_trait::async_trait;
use serde_json::Value;
use translator_core::ProviderId;
use url::Url;

use super::http::{execute, parse_body};
use super::{RequestLimits, Translator};
use crate::{ErrorKind, TranslateError};

const LABEL: &str = "Google Translate";

/// Keyless bulk-translate endpoint (`translate_a/single`, client `gtx`).
///
/// Has no credential, so there are no configuration, auth or rate-limit
/// failures: every non-2xx status is a transport error.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
    limits: RequestLimits,
}

impl GoogleTranslator {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        limits: RequestLimits,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            limits,
        }
    }

    fn endpoint(&self, text: &str, target_language: &str) -> Result<Url, TranslateError> {
        let base = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        Url::parse_with_params(
            &base,
            &[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|err| TranslateError::new(ErrorKind::Transport, format!("{LABEL} failed: {err}")))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn provider(&self) -> ProviderId {
        ProviderId::GoogleTranslate
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        let url = self.endpoint(text, target_language)?;
        let reply = execute(self.client.get(url), self.limits, LABEL).await?;

        if !reply.status.is_success() {
            return Err(TranslateError::new(
                ErrorKind::Transport,
                format!(
                    "{LABEL} failed: Network response was not ok, status: {}",
                    reply.status.as_u16()
                ),
            ));
        }

        let data: Value = parse_body(&reply.body, LABEL)?;
        join_sentences(&data).ok_or_else(|| {
            TranslateError::new(
                ErrorKind::Protocol,
                format!("{LABEL} failed: Invalid response format from {LABEL} API."),
            )
        })
    }
}

/// The body is `[[["translated", "source", ...], ...], ...]`; the
/// translation is the concatenation of the first field of every sentence.
fn join_sentences(data: &Value) -> Option<String> {
    let sentences = data.get(0)?.as_array()?;
    let mut out = String::new();
    for sentence in sentences {
        let part = sentence.as_array()?.first()?;
        if let Some(text) = part.as_str() {
            out.push_str(text);
        }
    }
    Some(out.trim().to_string())
}
