use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Translation backends selectable through the `translationService` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ProviderId {
    /// Keyless bulk-translate endpoint.
    #[default]
    GoogleTranslate,
    GeminiPro,
    GeminiFlash,
    /// Mistral through OpenRouter; the key is optional (free tier without one).
    Mistral,
}

/// Whether a provider fires on every observed message or waits for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
    Auto,
    Gated,
}

/// Named secret slots in the settings store. Both Gemini models share one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialSlot {
    Gemini,
    OpenRouter,
}

impl CredentialSlot {
    /// Settings-store key holding this secret.
    pub fn storage_key(self) -> &'static str {
        match self {
            CredentialSlot::Gemini => "geminiApiKey",
            CredentialSlot::OpenRouter => "openrouterApiKey",
        }
    }
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::GoogleTranslate,
        ProviderId::GeminiPro,
        ProviderId::GeminiFlash,
        ProviderId::Mistral,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            ProviderId::GoogleTranslate => "google_translate",
            ProviderId::GeminiPro => "gemini_pro",
            ProviderId::GeminiFlash => "gemini_flash",
            ProviderId::Mistral => "mistral",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_key() == key.trim())
    }

    /// Parses a stored service key, falling back to the keyless provider.
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_default()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderId::GoogleTranslate => "Google Translate",
            ProviderId::GeminiPro => "Gemini 2.5 Pro",
            ProviderId::GeminiFlash => "Gemini 2.0 Flash",
            ProviderId::Mistral => "Mistral AI",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ProviderId::GoogleTranslate => "🔤",
            ProviderId::GeminiPro => "🧠",
            ProviderId::GeminiFlash => "⚡",
            ProviderId::Mistral => "🚀",
        }
    }

    /// Rate- or cost-constrained providers are gated behind a user action.
    pub fn dispatch_policy(self) -> DispatchPolicy {
        match self {
            ProviderId::GoogleTranslate => DispatchPolicy::Auto,
            ProviderId::GeminiPro | ProviderId::GeminiFlash | ProviderId::Mistral => {
                DispatchPolicy::Gated
            }
        }
    }

    pub fn credential_slot(self) -> Option<CredentialSlot> {
        match self {
            ProviderId::GoogleTranslate => None,
            ProviderId::GeminiPro | ProviderId::GeminiFlash => Some(CredentialSlot::Gemini),
            ProviderId::Mistral => Some(CredentialSlot::OpenRouter),
        }
    }

    /// True when a missing credential must fail the job before any request.
    pub fn requires_credential(self) -> bool {
        matches!(self, ProviderId::GeminiPro | ProviderId::GeminiFlash)
    }
}

/// Provider configuration as read from the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target_language: String,
    pub provider: ProviderId,
    pub credentials: BTreeMap<CredentialSlot, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            provider: ProviderId::default(),
            credentials: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    pub fn with_credential(mut self, slot: CredentialSlot, secret: impl Into<String>) -> Self {
        self.credentials.insert(slot, secret.into());
        self
    }

    /// Returns the non-empty credential for `provider`, if one is stored.
    pub fn credential_for(&self, provider: ProviderId) -> Option<&str> {
        provider
            .credential_slot()
            .and_then(|slot| self.credentials.get(&slot))
            .map(|secret| secret.trim())
            .filter(|secret| !secret.is_empty())
    }

    /// Target language, or the default when the stored value is blank.
    pub fn effective_target_language(&self) -> &str {
        let language = self.target_language.trim();
        if language.is_empty() {
            DEFAULT_TARGET_LANGUAGE
        } else {
            language
        }
    }
}

/// Fixed delays and thresholds of the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverTimings {
    pub root_poll_interval: Duration,
    pub debounce: Duration,
    pub initial_scan_delay: Duration,
    pub settle_delay: Duration,
    /// A body mutation record adding more nodes than this counts as a page swap.
    pub structural_threshold: usize,
    /// Extracted text shorter than this (in chars) is not worth translating.
    pub min_text_chars: usize,
}

impl Default for ObserverTimings {
    fn default() -> Self {
        Self {
            root_poll_interval: Duration::from_millis(1000),
            debounce: Duration::from_millis(400),
            initial_scan_delay: Duration::from_millis(500),
            settle_delay: Duration::from_millis(500),
            structural_threshold: 10,
            min_text_chars: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_service_key_falls_back_to_keyless_provider() {
        assert_eq!(ProviderId::from_key("gemini_pro"), Some(ProviderId::GeminiPro));
        assert_eq!(ProviderId::from_key("deepl"), None);
        assert_eq!(
            ProviderId::from_key_or_default("deepl"),
            ProviderId::GoogleTranslate
        );
    }

    #[test]
    fn only_keyless_provider_auto_dispatches() {
        for provider in ProviderId::ALL {
            let expected = if provider == ProviderId::GoogleTranslate {
                DispatchPolicy::Auto
            } else {
                DispatchPolicy::Gated
            };
            assert_eq!(provider.dispatch_policy(), expected, "{provider:?}");
        }
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let settings = Settings::default().with_credential(CredentialSlot::Gemini, "   ");
        assert_eq!(settings.credential_for(ProviderId::GeminiPro), None);

        let settings = settings.with_credential(CredentialSlot::Gemini, " key ");
        assert_eq!(settings.credential_for(ProviderId::GeminiFlash), Some("key"));
        assert_eq!(settings.credential_for(ProviderId::GoogleTranslate), None);
    }

    #[test]
    fn blank_target_language_uses_default() {
        let settings = Settings::default().with_target_language(" ");
        assert_eq!(settings.effective_target_language(), DEFAULT_TARGET_LANGUAGE);
    }
}
