use std::sync::{mpsc, Arc};

use translator_core::{
    Effect, JobId, JobOutcome, Msg, NodeId, PageScan, ProcessingState, ScannedMessage,
};
use translator_engine::{
    ChatPage, ChatTextExtractor, Dispatcher, ReplySink, SettingsStore, TextExtractor,
    TranslateReply, TranslateRequest,
};
use translator_logging::{preview, tl_debug, tl_info, tl_warn};

use super::clock::Clock;
use super::timers::Timers;

/// Executes core effects against the page, the timers and the dispatcher.
///
/// Effects that observe the page (polls, scans, identity samples) hand their
/// observation back as a follow-up message.
pub struct EffectRunner<D> {
    dispatcher: D,
    extractor: Box<dyn TextExtractor>,
    store: Arc<dyn SettingsStore>,
    content_watcher: bool,
    structural_watcher: bool,
}

impl<D: Dispatcher> EffectRunner<D> {
    pub fn new(dispatcher: D, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            dispatcher,
            extractor: Box::new(ChatTextExtractor::new()),
            store,
            content_watcher: false,
            structural_watcher: false,
        }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn content_watcher_attached(&self) -> bool {
        self.content_watcher
    }

    pub fn structural_watcher_attached(&self) -> bool {
        self.structural_watcher
    }

    pub fn run<P: ChatPage, C: Clock>(
        &mut self,
        effect: Effect,
        page: &mut P,
        timers: &mut Timers,
        clock: &C,
    ) -> Option<Msg> {
        match effect {
            Effect::StartRootPolling { interval } => {
                timers.start_root_poll(clock.now(), interval);
                return Some(self.poll_root(page));
            }
            Effect::StopRootPolling => timers.stop_root_poll(),
            Effect::AttachContentWatcher => self.content_watcher = true,
            Effect::DetachContentWatcher => self.content_watcher = false,
            Effect::AttachStructuralWatcher => self.structural_watcher = true,
            Effect::DetachStructuralWatcher => self.structural_watcher = false,
            Effect::ArmDebounce { generation, delay } => {
                timers.arm_debounce(clock.now() + delay, generation);
            }
            Effect::ScanPage => return Some(self.scan(page, clock)),
            Effect::SampleIdentity => return Some(Msg::IdentitySampled(page.identity())),
            Effect::ScheduleSettle { delay } => timers.schedule_settle(clock.now() + delay),
            Effect::RemoveAffordances => {
                for node in page.remove_all_affordances() {
                    clear_button_marker(page, node);
                }
            }
            Effect::RemoveAffordance { node } => {
                page.remove_affordance(node);
                clear_button_marker(page, node);
            }
            Effect::ShowAffordance { node, affordance } => {
                page.remove_affordance(node);
                if page.show_affordance(node, &affordance) {
                    page.set_processing(node, ProcessingState::ButtonShown);
                } else {
                    tl_warn!("No place for the translate button on {node}");
                }
            }
            Effect::MarkPending { node, job_id } => {
                page.set_processing(node, ProcessingState::Pending);
                page.set_message_id(node, Some(job_id));
            }
            Effect::Dispatch { job_id, text } => {
                tl_debug!("Submitting {job_id}: {}", preview(&text, 40));
                self.dispatcher
                    .submit(TranslateRequest::new(job_id.to_string(), text));
            }
            Effect::Reconcile {
                node,
                job_id,
                annotation,
            } => {
                if !page.is_attached(node) {
                    tl_debug!("{node} is gone, dropping result of {job_id}");
                    return None;
                }
                let owner = page.markers(node).and_then(|markers| markers.message_id);
                if owner != Some(job_id) {
                    tl_warn!("{node} now belongs to {owner:?}, dropping result of {job_id}");
                    return None;
                }
                page.set_processing(node, ProcessingState::None);
                page.mark_translated(node);
                if !page.insert_annotation(node, &annotation) {
                    tl_warn!("No insertion point on {node} for {job_id}");
                } else if annotation.is_error() {
                    tl_warn!("{job_id} failed: {}", annotation.text());
                } else {
                    tl_info!("{job_id} translated on {node}");
                }
            }
        }
        None
    }

    pub fn poll_root<P: ChatPage>(&self, page: &P) -> Msg {
        Msg::RootPolled {
            root_present: page.has_chat_root(),
            identity: page.identity(),
        }
    }

    /// Snapshot for one scan cycle. Configuration is read fresh every time.
    fn scan<P: ChatPage, C: Clock>(&self, page: &P, clock: &C) -> Msg {
        let provider = self.store.load().provider;
        let messages = page
            .message_nodes()
            .into_iter()
            .filter_map(|node| {
                let markers = page.markers(node)?;
                let text = if markers.is_eligible() {
                    page.message_html(node)
                        .map(|html| self.extractor.extract(&html))
                        .unwrap_or_default()
                } else {
                    String::new()
                };
                Some(ScannedMessage {
                    node,
                    markers,
                    text,
                })
            })
            .collect::<Vec<_>>();
        tl_debug!("Scan found {} message nodes", messages.len());
        Msg::PageScanned(PageScan {
            identity: page.identity(),
            provider,
            messages,
            at_ms: clock.epoch_ms(),
        })
    }
}

fn clear_button_marker<P: ChatPage>(page: &mut P, node: NodeId) {
    let shown = page
        .markers(node)
        .is_some_and(|markers| markers.processing == ProcessingState::ButtonShown);
    if shown {
        page.set_processing(node, ProcessingState::None);
    }
}

/// Turns a reply from any channel into the message the core expects.
pub fn reply_to_msg(reply: TranslateReply) -> Option<Msg> {
    let job_id: JobId = match reply.job_id().parse() {
        Ok(job_id) => job_id,
        Err(err) => {
            tl_warn!("Ignoring reply: {err}");
            return None;
        }
    };
    let outcome = match reply {
        TranslateReply::Response {
            translated_text, ..
        } => JobOutcome::Translated(translated_text),
        TranslateReply::Error { error, .. } => JobOutcome::Failed(error),
    };
    Some(Msg::TranslationSettled { job_id, outcome })
}

/// Feeds engine replies into the driver's message channel.
pub struct MsgReplySink {
    tx: mpsc::Sender<Msg>,
}

impl MsgReplySink {
    pub fn new(tx: mpsc::Sender<Msg>) -> Self {
        Self { tx }
    }
}

impl ReplySink for MsgReplySink {
    fn deliver(&self, reply: TranslateReply) {
        if let Some(msg) = reply_to_msg(reply) {
            let _ = self.tx.send(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_become_settled_messages() {
        assert_eq!(
            reply_to_msg(TranslateReply::translated("msg_bubble_10_2", "Hola")),
            Some(Msg::TranslationSettled {
                job_id: JobId::new(10, 2),
                outcome: JobOutcome::Translated("Hola".into()),
            })
        );
        assert_eq!(
            reply_to_msg(TranslateReply::failed("msg_bubble_10_3", "quota")),
            Some(Msg::TranslationSettled {
                job_id: JobId::new(10, 3),
                outcome: JobOutcome::Failed("quota".into()),
            })
        );
    }

    #[test]
    fn foreign_job_ids_are_ignored() {
        assert_eq!(reply_to_msg(TranslateReply::translated("job-7", "x")), None);
    }
}
