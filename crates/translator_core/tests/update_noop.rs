use translator_core::{update, JobId, JobOutcome, Msg, TranslatorState};

#[test]
fn unloaded_state_ignores_every_message() {
    let (state, _) = update(TranslatorState::new(), Msg::Started);
    let (state, _) = update(state, Msg::Unloading);

    for msg in [Msg::Started, Msg::Unloading, Msg::SettleElapsed, Msg::ContentMutated] {
        let (next, effects) = update(state.clone(), msg.clone());
        assert_eq!(next, state, "{msg:?}");
        assert!(effects.is_empty(), "{msg:?}");
    }
}

#[test]
fn events_before_attachment_change_nothing() {
    let state = TranslatorState::new();
    for msg in [
        Msg::ContentMutated,
        Msg::BodyMutated {
            added_per_record: vec![50],
        },
        Msg::DebounceElapsed { generation: 0 },
        Msg::TranslationSettled {
            job_id: JobId::new(1, 1),
            outcome: JobOutcome::Translated("x".into()),
        },
    ] {
        let (next, effects) = update(state.clone(), msg.clone());
        assert_eq!(next, state, "{msg:?}");
        assert!(effects.is_empty(), "{msg:?}");
    }
}
