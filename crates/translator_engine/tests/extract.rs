use pretty_assertions::assert_eq;
use translator_engine::{ChatTextExtractor, TextExtractor};

#[test]
fn plain_text_is_trimmed() {
    let extractor = ChatTextExtractor::new();
    assert_eq!(extractor.extract("  Hello there \n"), "Hello there");
}

#[test]
fn line_breaks_become_newlines() {
    let extractor = ChatTextExtractor::new();
    assert_eq!(
        extractor.extract("first line<br>second line<br/>third"),
        "first line\nsecond line\nthird"
    );
}

#[test]
fn chrome_is_removed() {
    let html = r#"
        <span class="sender-name">Alice</span>
        Meet me at <b>noon</b>
        <span class="message-time">12:01</span>
        <div class="Reactions"><span>👍 3</span></div>
        <span class="MessageMeta"><span class="message-views">120</span></span>
    "#;
    let extractor = ChatTextExtractor::new();
    assert_eq!(extractor.extract(html), "Meet me at noon");
}

#[test]
fn nested_chrome_inside_text_is_removed() {
    let html = r#"Check <a class="text-entity-link" href="https://x.example">this link</a> out <img class="custom-emoji" alt="🔥">"#;
    let extractor = ChatTextExtractor::new();
    assert_eq!(extractor.extract(html), "Check  out");
}

#[test]
fn chrome_only_message_extracts_empty() {
    let html = r#"<span class="message-time">09:15</span><span class="quick-reaction">❤</span>"#;
    let extractor = ChatTextExtractor::new();
    assert_eq!(extractor.extract(html), "");
}

#[test]
fn custom_chrome_selectors_replace_defaults() {
    let extractor = ChatTextExtractor::with_chrome_selectors(&[".footnote"]);
    assert_eq!(
        extractor.extract(
            r#"Body <span class="footnote">[1]</span><span class="message-time">10:00</span>"#
        ),
        "Body 10:00"
    );
}
