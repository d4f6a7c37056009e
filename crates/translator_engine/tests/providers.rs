use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use translator_core::{CredentialSlot, ProviderId, Settings};
use translator_engine::{ErrorKind, ProviderFactory, ProviderSettings, Translator};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn translator_for(server: &MockServer, settings: &Settings) -> Box<dyn Translator> {
    ProviderFactory::new(ProviderSettings::with_base_url(server.uri()))
        .expect("client")
        .translator(settings)
}

fn gemini_flash(key: &str) -> Settings {
    Settings::default()
        .with_provider(ProviderId::GeminiFlash)
        .with_credential(CredentialSlot::Gemini, key)
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

#[tokio::test]
async fn google_joins_sentences_and_trims() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("client", "gtx"))
        .and(query_param("sl", "auto"))
        .and(query_param("tl", "es"))
        .and(query_param("q", "Hello world. How are you?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [["Hola mundo. ", "Hello world. ", null], ["¿Cómo estás? ", "How are you?", null]],
            null,
            "en"
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let translator = translator_for(&server, &Settings::default());
    let translated = translator
        .translate("Hello world. How are you?", "es")
        .await
        .expect("translated");
    assert_eq!(translated, "Hola mundo. ¿Cómo estás?");
}

#[tokio::test]
async fn google_server_error_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = translator_for(&server, &Settings::default())
        .translate("Hello", "de")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert_eq!(
        err.message,
        "Google Translate failed: Network response was not ok, status: 503"
    );
}

#[tokio::test]
async fn google_unexpected_shape_is_protocol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let err = translator_for(&server, &Settings::default())
        .translate("Hello", "de")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Protocol);
}

#[tokio::test]
async fn gemini_sends_prompt_and_returns_first_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "AIza-test"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "Translate this text to Spanish. Preserve the original tone and context. Return only the translation without any explanations:\n\nGood morning"}]}],
            "generationConfig": {"maxOutputTokens": 2000, "topK": 40}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("  Buenos días\n")))
        .expect(1)
        .mount(&server)
        .await;

    let translated = translator_for(&server, &gemini_flash("AIza-test"))
        .translate("Good morning", "es")
        .await
        .expect("translated");
    assert_eq!(translated, "Buenos días");
}

#[tokio::test]
async fn gemini_pro_uses_pro_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Bonjour")))
        .expect(1)
        .mount(&server)
        .await;

    let settings = gemini_flash("AIza-test").with_provider(ProviderId::GeminiPro);
    let translated = translator_for(&server, &settings)
        .translate("Hello", "fr")
        .await
        .expect("translated");
    assert_eq!(translated, "Bonjour");
}

#[tokio::test]
async fn gemini_status_codes_map_to_error_kinds() {
    let cases = [
        (429, ErrorKind::RateLimit),
        (401, ErrorKind::Auth),
        (403, ErrorKind::Auth),
        (400, ErrorKind::Auth),
        (500, ErrorKind::Transport),
    ];
    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = translator_for(&server, &gemini_flash("AIza-test"))
            .translate("Hello", "fr")
            .await
            .unwrap_err();
        assert_eq!(err.kind, expected, "status {status}");
    }
}

#[tokio::test]
async fn gemini_rate_limit_message_is_user_facing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = translator_for(&server, &gemini_flash("AIza-test"))
        .translate("Hello", "fr")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Gemini API quota exceeded. Please try again later.");
}

#[tokio::test]
async fn gemini_without_candidates_is_protocol() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = translator_for(&server, &gemini_flash("AIza-test"))
        .translate("Hello", "fr")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Protocol);
}

#[tokio::test]
async fn gemini_missing_key_never_touches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("unused")))
        .expect(0)
        .mount(&server)
        .await;

    for settings in [
        Settings::default().with_provider(ProviderId::GeminiPro),
        gemini_flash("   "),
    ] {
        let err = translator_for(&server, &settings)
            .translate("Hello", "fr")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("API key not found"));
    }
}

#[tokio::test]
async fn mistral_with_key_sends_bearer_and_paid_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-or-test"))
        .and(header("x-title", "Telegram Translator"))
        .and(body_partial_json(json!({
            "model": "mistralai/mistral-7b-instruct",
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": " Hallo Welt "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Settings::default()
        .with_provider(ProviderId::Mistral)
        .with_credential(CredentialSlot::OpenRouter, "sk-or-test");
    let translated = translator_for(&server, &settings)
        .translate("Hello world", "de")
        .await
        .expect("translated");
    assert_eq!(translated, "Hallo Welt");
}

#[tokio::test]
async fn mistral_without_key_uses_free_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(body_partial_json(json!({"model": "mistralai/mistral-7b-instruct:free"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "Ciao"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = Settings::default().with_provider(ProviderId::Mistral);
    let translated = translator_for(&server, &settings)
        .translate("Hi", "it")
        .await
        .expect("translated");
    assert_eq!(translated, "Ciao");
}

#[tokio::test]
async fn mistral_throttle_and_bad_key() {
    for (status, expected) in [(429, ErrorKind::RateLimit), (401, ErrorKind::Auth)] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let settings = Settings::default().with_provider(ProviderId::Mistral);
        let err = translator_for(&server, &settings)
            .translate("Hi", "it")
            .await
            .unwrap_err();
        assert_eq!(err.kind, expected, "status {status}");
    }
}

#[tokio::test]
async fn mistral_empty_content_is_protocol() {
    for content in ["", "   "] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": content}}]
            })))
            .mount(&server)
            .await;

        let settings = Settings::default().with_provider(ProviderId::Mistral);
        let err = translator_for(&server, &settings)
            .translate("Hi", "it")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Protocol, "content {content:?}");
        assert!(err.message.starts_with("Unexpected response format from"));
    }
}

#[tokio::test]
async fn oversized_body_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
        .mount(&server)
        .await;

    let settings = ProviderSettings {
        max_response_bytes: 1024,
        ..ProviderSettings::with_base_url(server.uri())
    };
    let err = ProviderFactory::new(settings)
        .expect("client")
        .translator(&Settings::default())
        .translate("Hello", "de")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.message.contains("too large"));
}

#[tokio::test]
async fn configured_timeout_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([[["late", "late"]]]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let settings = ProviderSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ProviderSettings::with_base_url(server.uri())
    };
    let err = ProviderFactory::new(settings)
        .expect("client")
        .translator(&Settings::default())
        .translate("Hello", "de")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transport);
}
