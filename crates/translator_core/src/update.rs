use std::collections::BTreeSet;

use translator_logging::{tl_debug, tl_info, tl_warn};

use crate::state::GatedMessage;
use crate::{
    Affordance, Annotation, ChatIdentity, DispatchPolicy, Effect, JobOutcome, Msg, NodeId,
    PageScan, ProviderId, ScannedMessage, TranslatorState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TranslatorState, msg: Msg) -> (TranslatorState, Vec<Effect>) {
    if state.unloaded {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Started => {
            if state.polling || state.content_attached {
                Vec::new()
            } else {
                state.polling = true;
                vec![Effect::StartRootPolling {
                    interval: state.timings().root_poll_interval,
                }]
            }
        }
        Msg::RootPolled {
            root_present,
            identity,
        } => attach_if_ready(&mut state, root_present, identity),
        Msg::ContentMutated => {
            if state.content_attached {
                let generation = state.bump_debounce();
                vec![Effect::ArmDebounce {
                    generation,
                    delay: state.timings().debounce,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::BodyMutated { added_per_record } => {
            let threshold = state.timings().structural_threshold;
            let major = added_per_record.iter().any(|added| *added > threshold);
            if state.structural_attached && major {
                tl_info!("Major page change detected, checking navigation");
                vec![Effect::SampleIdentity]
            } else {
                Vec::new()
            }
        }
        Msg::DebounceElapsed { generation } => {
            if state.content_attached && generation == state.debounce_generation {
                vec![Effect::ScanPage]
            } else {
                tl_debug!("Ignoring stale debounce generation {generation}");
                Vec::new()
            }
        }
        Msg::PageScanned(scan) => scan_cycle(&mut state, scan),
        Msg::IdentitySampled(identity) => check_navigation(&mut state, identity),
        Msg::SettleElapsed => {
            if state.content_attached || state.polling {
                Vec::new()
            } else {
                state.polling = true;
                vec![Effect::StartRootPolling {
                    interval: state.timings().root_poll_interval,
                }]
            }
        }
        Msg::AffordanceActivated { node, at_ms } => match state.gated.remove(&node) {
            Some(gated) => {
                tl_info!(
                    "Affordance activated on {node}, dispatching via {}",
                    gated.provider.display_name()
                );
                let mut effects = vec![Effect::RemoveAffordance { node }];
                effects.extend(dispatch(&mut state, node, gated.text, at_ms));
                effects
            }
            None => {
                tl_debug!("Activation on {node} has no pending affordance");
                Vec::new()
            }
        },
        Msg::TranslationSettled { job_id, outcome } => match state.registry.resolve(&job_id) {
            Some(node) => {
                let annotation = match outcome {
                    JobOutcome::Translated(text) => Annotation::Translation(text),
                    JobOutcome::Failed(reason) => Annotation::Error(reason),
                };
                vec![Effect::Reconcile {
                    node,
                    job_id,
                    annotation,
                }]
            }
            None => {
                tl_debug!("Reply for unknown job {job_id} dropped");
                Vec::new()
            }
        },
        Msg::Unloading => {
            state.unloaded = true;
            state.polling = false;
            state.bump_debounce();
            let mut effects = vec![Effect::StopRootPolling];
            if std::mem::take(&mut state.content_attached) {
                effects.push(Effect::DetachContentWatcher);
            }
            if std::mem::take(&mut state.structural_attached) {
                effects.push(Effect::DetachStructuralWatcher);
            }
            effects
        }
    };

    (state, effects)
}

fn attach_if_ready(
    state: &mut TranslatorState,
    root_present: bool,
    identity: ChatIdentity,
) -> Vec<Effect> {
    if state.content_attached || !root_present {
        return Vec::new();
    }

    tl_info!("Chat root found, attaching observers for {identity}");
    state.content_attached = true;
    state.polling = false;
    state.last_identity = Some(identity);

    let mut effects = vec![Effect::StopRootPolling, Effect::AttachContentWatcher];
    if !state.structural_attached {
        state.structural_attached = true;
        effects.push(Effect::AttachStructuralWatcher);
    }
    let generation = state.bump_debounce();
    effects.push(Effect::ArmDebounce {
        generation,
        delay: state.timings().initial_scan_delay,
    });
    effects
}

/// Updates the last known identity and resets when it changed.
fn check_navigation(state: &mut TranslatorState, identity: ChatIdentity) -> Vec<Effect> {
    let changed = state
        .last_identity
        .as_ref()
        .is_some_and(|last| *last != identity);
    let effects = if changed {
        tl_info!(
            "Navigation detected: {} -> {identity}",
            state
                .last_identity
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        );
        state.reset()
    } else {
        Vec::new()
    };
    state.last_identity = Some(identity);
    effects
}

fn scan_cycle(state: &mut TranslatorState, scan: PageScan) -> Vec<Effect> {
    state.scan_cycles += 1;
    let PageScan {
        identity,
        provider,
        messages,
        at_ms,
    } = scan;

    let mut effects = check_navigation(state, identity);
    forget_evicted_affordances(state, &messages);
    let min_chars = state.timings().min_text_chars;
    let mut processed = 0usize;

    for message in messages {
        if !message.markers.is_eligible()
            || state.is_tracking(message.node)
            || state.is_gated(message.node)
        {
            continue;
        }
        if message.text.chars().count() < min_chars {
            // Left unmarked on purpose; re-evaluated on a later scan.
            continue;
        }
        processed += 1;
        effects.extend(process_message(state, message.node, message.text, provider, at_ms));
    }

    tl_info!("Processed {processed} new messages");
    effects
}

/// Gated entries only live as long as their message is on the page.
fn forget_evicted_affordances(state: &mut TranslatorState, messages: &[ScannedMessage]) {
    let on_page: BTreeSet<NodeId> = messages.iter().map(|message| message.node).collect();
    let before = state.gated.len();
    state.gated.retain(|node, _| on_page.contains(node));
    let evicted = before - state.gated.len();
    if evicted > 0 {
        tl_debug!("Forgot {evicted} affordances whose messages left the page");
    }
}

fn process_message(
    state: &mut TranslatorState,
    node: NodeId,
    text: String,
    provider: ProviderId,
    at_ms: u64,
) -> Vec<Effect> {
    match provider.dispatch_policy() {
        DispatchPolicy::Auto => dispatch(state, node, text, at_ms),
        DispatchPolicy::Gated => {
            state.gated.insert(node, GatedMessage { text, provider });
            vec![Effect::ShowAffordance {
                node,
                affordance: Affordance { provider },
            }]
        }
    }
}

fn dispatch(state: &mut TranslatorState, node: NodeId, text: String, at_ms: u64) -> Vec<Effect> {
    let job_id = state.next_job_id(at_ms);
    if let Err(err) = state.registry.register(job_id, node) {
        tl_warn!("Not dispatching for {node}: {err}");
        return Vec::new();
    }
    tl_debug!("Dispatching job {job_id} for {node}");
    vec![
        Effect::MarkPending { node, job_id },
        Effect::Dispatch { job_id, text },
    ]
}
