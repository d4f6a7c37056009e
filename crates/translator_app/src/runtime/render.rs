use std::fmt::Write;

use translator_core::{ProcessingState, TranslatorView};
use translator_engine::{ChatTextExtractor, SnapshotPage, TextExtractor};

pub fn render_status(view: &TranslatorView) -> String {
    let chat = view
        .identity
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let observer = match (view.unloaded, view.observer_attached, view.polling) {
        (true, _, _) => "Unloaded",
        (false, true, _) => "Observing",
        (false, false, true) => "Waiting for chat",
        (false, false, false) => "Idle",
    };
    format!(
        "Chat: {chat} | {observer} | Jobs: {} issued, {} pending | Buttons: {} | Scans: {} | Resets: {}",
        view.jobs_issued, view.pending_jobs, view.shown_affordances, view.scan_cycles, view.resets
    )
}

/// One block per message: its text, then whatever the translator put after it.
pub fn render_transcript(page: &SnapshotPage) -> String {
    let extractor = ChatTextExtractor::new();
    let mut out = String::new();
    for (node, element) in page.elements() {
        if !element.is_attached() {
            continue;
        }
        let state = match (element.markers.processing, element.markers.translated) {
            (_, true) => "translated",
            (ProcessingState::Pending, _) => "pending",
            (ProcessingState::ButtonShown, _) => "button",
            (ProcessingState::None, false) => "new",
        };
        let _ = writeln!(out, "[{node}] ({state}) {}", extractor.extract(&element.text_html));
        if let Some(affordance) = &element.affordance {
            let _ = writeln!(out, "    [{}]", affordance.label());
        }
        if let Some(annotation) = &element.annotation {
            let _ = writeln!(out, "    {}", annotation.text());
        }
    }
    out
}
