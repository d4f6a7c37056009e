use pretty_assertions::assert_eq;
use translator_core::{
    update, Affordance, Annotation, ChatIdentity, Effect, JobId, JobOutcome, Msg, NodeId,
    NodeMarkers, PageScan, ProcessingState, ProviderId, ScannedMessage, TranslatorState,
};

fn chat() -> ChatIdentity {
    ChatIdentity::new("https://web.example.com/a/#-100", Some("Team"))
}

fn attached() -> TranslatorState {
    let (state, _) = update(TranslatorState::new(), Msg::Started);
    let (state, _) = update(
        state,
        Msg::RootPolled {
            root_present: true,
            identity: chat(),
        },
    );
    state
}

fn scan_with(provider: ProviderId, messages: Vec<ScannedMessage>) -> Msg {
    Msg::PageScanned(PageScan {
        identity: chat(),
        provider,
        messages,
        at_ms: 1_700_000_000_000,
    })
}

fn message(node: u64, text: &str) -> ScannedMessage {
    ScannedMessage {
        node: NodeId(node),
        markers: NodeMarkers::default(),
        text: text.to_string(),
    }
}

fn dispatched_job(effects: &[Effect]) -> JobId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Dispatch { job_id, .. } => Some(*job_id),
            _ => None,
        })
        .expect("dispatch effect")
}

#[test]
fn keyless_provider_dispatches_immediately() {
    let (state, effects) = update(
        attached(),
        scan_with(ProviderId::GoogleTranslate, vec![message(1, "Hello there")]),
    );

    let job_id = JobId::new(1_700_000_000_000, 1);
    assert_eq!(
        effects,
        vec![
            Effect::MarkPending {
                node: NodeId(1),
                job_id
            },
            Effect::Dispatch {
                job_id,
                text: "Hello there".to_string()
            },
        ]
    );
    assert_eq!(state.view().pending_jobs, 1);
    assert_eq!(state.view().shown_affordances, 0);

    let (state, effects) = update(
        state,
        Msg::TranslationSettled {
            job_id,
            outcome: JobOutcome::Translated("Hola".into()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Reconcile {
            node: NodeId(1),
            job_id,
            annotation: Annotation::Translation("Hola".into()),
        }]
    );
    assert_eq!(state.view().pending_jobs, 0);
}

#[test]
fn failures_become_error_annotations() {
    let (state, effects) = update(
        attached(),
        scan_with(ProviderId::GoogleTranslate, vec![message(4, "Hello there")]),
    );
    let job_id = dispatched_job(&effects);

    let (_, effects) = update(
        state,
        Msg::TranslationSettled {
            job_id,
            outcome: JobOutcome::Failed("Google Translate failed: status 503".into()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::Reconcile {
            node: NodeId(4),
            job_id,
            annotation: Annotation::Error("Google Translate failed: status 503".into()),
        }]
    );
}

#[test]
fn gated_provider_shows_affordance_and_waits_for_activation() {
    let (state, effects) = update(
        attached(),
        scan_with(ProviderId::GeminiPro, vec![message(2, "Hello there")]),
    );
    assert_eq!(
        effects,
        vec![Effect::ShowAffordance {
            node: NodeId(2),
            affordance: Affordance {
                provider: ProviderId::GeminiPro
            },
        }]
    );
    assert_eq!(state.view().pending_jobs, 0);
    assert_eq!(state.view().shown_affordances, 1);

    let (state, effects) = update(
        state,
        Msg::AffordanceActivated {
            node: NodeId(2),
            at_ms: 5,
        },
    );
    let job_id = JobId::new(5, 1);
    assert_eq!(
        effects,
        vec![
            Effect::RemoveAffordance { node: NodeId(2) },
            Effect::MarkPending {
                node: NodeId(2),
                job_id
            },
            Effect::Dispatch {
                job_id,
                text: "Hello there".to_string()
            },
        ]
    );
    assert_eq!(state.view().shown_affordances, 0);

    // A second click has nothing left to dispatch.
    let (_, effects) = update(
        state,
        Msg::AffordanceActivated {
            node: NodeId(2),
            at_ms: 6,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn affordances_of_evicted_messages_are_forgotten() {
    let (state, _) = update(
        attached(),
        scan_with(
            ProviderId::Mistral,
            vec![message(1, "Guten Morgen"), message(2, "Bis später")],
        ),
    );
    assert_eq!(state.view().shown_affordances, 2);

    let still_shown = ScannedMessage {
        markers: NodeMarkers {
            processing: ProcessingState::ButtonShown,
            ..NodeMarkers::default()
        },
        ..message(2, "Bis später")
    };
    let (state, effects) = update(state, scan_with(ProviderId::Mistral, vec![still_shown]));
    assert!(effects.is_empty());
    assert_eq!(state.view().shown_affordances, 1);
    assert!(!state.is_gated(NodeId(1)));
    assert!(state.is_gated(NodeId(2)));

    let (_, effects) = update(
        state,
        Msg::AffordanceActivated {
            node: NodeId(1),
            at_ms: 9,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn marked_nodes_are_never_dispatched_again() {
    let state = attached();
    let (state, first) = update(
        state,
        scan_with(ProviderId::GoogleTranslate, vec![message(1, "Hello there")]),
    );
    assert_eq!(first.len(), 2);

    // Same node re-scanned before the page applied any marker.
    let (state, effects) = update(
        state,
        scan_with(ProviderId::GoogleTranslate, vec![message(1, "Hello there")]),
    );
    assert!(effects.is_empty());

    for markers in [
        NodeMarkers {
            processing: ProcessingState::Pending,
            ..NodeMarkers::default()
        },
        NodeMarkers {
            processing: ProcessingState::ButtonShown,
            ..NodeMarkers::default()
        },
        NodeMarkers {
            translated: true,
            ..NodeMarkers::default()
        },
    ] {
        let (_, effects) = update(
            state.clone(),
            scan_with(
                ProviderId::GoogleTranslate,
                vec![ScannedMessage {
                    node: NodeId(9),
                    markers: markers.clone(),
                    text: "Hello there".into(),
                }],
            ),
        );
        assert!(effects.is_empty(), "{markers:?}");
    }
}

#[test]
fn short_text_is_skipped_without_marking() {
    let (state, effects) = update(
        attached(),
        scan_with(
            ProviderId::GoogleTranslate,
            vec![message(1, ""), message(2, "k"), message(3, "ok")],
        ),
    );
    assert_eq!(effects.len(), 2, "only node 3 is dispatched");
    assert!(!state.is_tracking(NodeId(1)));
    assert!(!state.is_tracking(NodeId(2)));

    // Content grew in place; the next scan picks the node up.
    let (state, effects) = update(
        state,
        scan_with(ProviderId::GoogleTranslate, vec![message(2, "kthx")]),
    );
    assert_eq!(effects.len(), 2);
    assert!(state.is_tracking(NodeId(2)));
}

#[test]
fn replies_resolve_once() {
    let (state, effects) = update(
        attached(),
        scan_with(ProviderId::GoogleTranslate, vec![message(1, "Hello there")]),
    );
    let job_id = dispatched_job(&effects);
    let settled = Msg::TranslationSettled {
        job_id,
        outcome: JobOutcome::Translated("Hola".into()),
    };

    let (state, first) = update(state, settled.clone());
    let (_, second) = update(state, settled);
    assert_eq!(first.len(), 1);
    assert!(second.is_empty(), "duplicate delivery is dropped");
}

#[test]
fn job_ids_keep_increasing_across_resets() {
    let (state, effects) = update(
        attached(),
        scan_with(ProviderId::GoogleTranslate, vec![message(1, "Hello there")]),
    );
    let first = dispatched_job(&effects);

    let mut state = state;
    state.reset();
    let (_, effects) = update(
        state,
        scan_with(ProviderId::GoogleTranslate, vec![message(1, "Hello there")]),
    );
    let second = dispatched_job(&effects);
    assert!(second.seq > first.seq);
    assert_ne!(first, second);
}
