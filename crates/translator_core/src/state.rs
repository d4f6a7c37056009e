use std::collections::BTreeMap;

use crate::view_model::TranslatorView;
use crate::{ChatIdentity, Effect, JobId, JobRegistry, NodeId, ObserverTimings, ProviderId};

/// A message waiting behind a gated affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GatedMessage {
    pub(crate) text: String,
    pub(crate) provider: ProviderId,
}

/// All mutable state of the translator for one page context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatorState {
    timings: ObserverTimings,
    pub(crate) registry: JobRegistry,
    pub(crate) gated: BTreeMap<NodeId, GatedMessage>,
    pub(crate) last_identity: Option<ChatIdentity>,
    pub(crate) polling: bool,
    pub(crate) content_attached: bool,
    pub(crate) structural_attached: bool,
    pub(crate) debounce_generation: u64,
    pub(crate) unloaded: bool,
    next_seq: u64,
    pub(crate) scan_cycles: u64,
    pub(crate) resets: u64,
}

impl TranslatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timings(timings: ObserverTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn timings(&self) -> &ObserverTimings {
        &self.timings
    }

    pub fn view(&self) -> TranslatorView {
        TranslatorView {
            identity: self.last_identity.clone(),
            polling: self.polling,
            observer_attached: self.content_attached,
            structural_attached: self.structural_attached,
            pending_jobs: self.registry.len(),
            shown_affordances: self.gated.len(),
            jobs_issued: self.next_seq,
            scan_cycles: self.scan_cycles,
            resets: self.resets,
            unloaded: self.unloaded,
        }
    }

    pub fn is_tracking(&self, node: NodeId) -> bool {
        self.registry.is_tracking(node)
    }

    pub fn is_gated(&self, node: NodeId) -> bool {
        self.gated.contains_key(&node)
    }

    pub(crate) fn next_job_id(&mut self, at_ms: u64) -> JobId {
        self.next_seq += 1;
        JobId::new(at_ms, self.next_seq)
    }

    pub(crate) fn bump_debounce(&mut self) -> u64 {
        self.debounce_generation += 1;
        self.debounce_generation
    }

    /// Navigation reset: forget every job and affordance, drop the content
    /// watcher and schedule re-attachment after the settle delay.
    ///
    /// The job counter is kept so ids stay unique across resets.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.registry.clear();
        self.gated.clear();
        self.resets += 1;
        self.content_attached = false;
        self.polling = false;
        // Invalidate a debounce window that was armed for the old chat.
        self.bump_debounce();
        vec![
            Effect::RemoveAffordances,
            Effect::DetachContentWatcher,
            Effect::StopRootPolling,
            Effect::ScheduleSettle {
                delay: self.timings.settle_delay,
            },
        ]
    }
}
