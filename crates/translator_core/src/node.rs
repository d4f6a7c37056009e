use std::fmt;

use crate::{JobId, ProviderId};

/// Prefix shown in front of every injected translation or error.
pub const TRANSLATION_MARKER: &str = "🌐";

/// Opaque handle to a message element owned by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingState {
    #[default]
    None,
    Pending,
    ButtonShown,
}

/// Markers the translator attaches to a message element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeMarkers {
    pub processing: ProcessingState,
    pub translated: bool,
    pub message_id: Option<JobId>,
}

impl NodeMarkers {
    /// The single idempotency guard: only untouched nodes may be processed.
    pub fn is_eligible(&self) -> bool {
        self.processing == ProcessingState::None && !self.translated
    }
}

/// Text injected after a message's content container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Translation(String),
    Error(String),
}

impl Annotation {
    pub fn is_error(&self) -> bool {
        matches!(self, Annotation::Error(_))
    }

    /// Rendered text, prefixed with the translation marker.
    pub fn text(&self) -> String {
        match self {
            Annotation::Translation(text) => format!("{TRANSLATION_MARKER} {text}"),
            Annotation::Error(reason) => {
                format!("{TRANSLATION_MARKER} Translation error: {reason}")
            }
        }
    }
}

/// The user-actionable "translate" control shown for gated providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance {
    pub provider: ProviderId,
}

impl Affordance {
    pub fn label(&self) -> String {
        format!(
            "{} Translate with {}",
            self.provider.icon(),
            self.provider.display_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_marker_makes_node_ineligible() {
        assert!(NodeMarkers::default().is_eligible());
        for processing in [ProcessingState::Pending, ProcessingState::ButtonShown] {
            let markers = NodeMarkers {
                processing,
                ..NodeMarkers::default()
            };
            assert!(!markers.is_eligible());
        }
        let translated = NodeMarkers {
            translated: true,
            ..NodeMarkers::default()
        };
        assert!(!translated.is_eligible());
    }

    #[test]
    fn annotations_carry_marker_prefix() {
        assert_eq!(Annotation::Translation("Hola".into()).text(), "🌐 Hola");
        assert_eq!(
            Annotation::Error("quota".into()).text(),
            "🌐 Translation error: quota"
        );
    }

    #[test]
    fn affordance_label_names_provider() {
        let affordance = Affordance {
            provider: ProviderId::GeminiFlash,
        };
        assert_eq!(affordance.label(), "⚡ Translate with Gemini 2.0 Flash");
    }
}
