use std::collections::VecDeque;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use translator_core::{update, Msg, NodeId, ObserverTimings, TranslatorState, TranslatorView};
use translator_engine::{ChatPage, Dispatcher, ReplySink, SettingsStore};
use translator_logging::{tl_debug, tl_info};

use super::clock::Clock;
use super::effects::{EffectRunner, MsgReplySink};
use super::timers::{TimerEvent, Timers};

/// Single-threaded driver around the pure core.
///
/// Every message goes through [`Driver::dispatch_msg`], which runs `update`
/// and then the resulting effects. Observations made by effects are queued
/// behind the current message, so a scan cycle never interleaves with another.
/// Translation replies arrive on a channel from the engine thread.
pub struct Driver<P, D, C> {
    state: TranslatorState,
    page: P,
    runner: EffectRunner<D>,
    timers: Timers,
    clock: C,
    msg_rx: mpsc::Receiver<Msg>,
}

impl<P, D, C> Driver<P, D, C>
where
    P: ChatPage,
    D: Dispatcher,
    C: Clock,
{
    /// `connect` receives the sink replies must be delivered to and returns
    /// the dispatcher that will carry requests.
    pub fn new<F>(
        page: P,
        store: Arc<dyn SettingsStore>,
        clock: C,
        timings: ObserverTimings,
        connect: F,
    ) -> Self
    where
        F: FnOnce(Arc<dyn ReplySink>) -> D,
    {
        let (msg_tx, msg_rx) = mpsc::channel();
        let dispatcher = connect(Arc::new(MsgReplySink::new(msg_tx)));
        Self {
            state: TranslatorState::with_timings(timings),
            page,
            runner: EffectRunner::new(dispatcher, store),
            timers: Timers::default(),
            clock,
            msg_rx,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn dispatcher(&self) -> &D {
        self.runner.dispatcher()
    }

    pub fn view(&self) -> TranslatorView {
        self.state.view()
    }

    pub fn start(&mut self) {
        self.dispatch_msg(Msg::Started);
    }

    pub fn unload(&mut self) {
        self.dispatch_msg(Msg::Unloading);
        self.timers.clear();
    }

    /// A mutation under the chat root. Ignored while no content watcher is attached.
    pub fn notify_content_mutation(&mut self) {
        if self.runner.content_watcher_attached() {
            self.dispatch_msg(Msg::ContentMutated);
        }
    }

    /// A mutation batch on the body's children, one count per record.
    pub fn notify_body_mutation(&mut self, added_per_record: Vec<usize>) {
        if self.runner.structural_watcher_attached() {
            self.dispatch_msg(Msg::BodyMutated { added_per_record });
        }
    }

    pub fn activate_affordance(&mut self, node: NodeId) {
        let at_ms = self.clock.epoch_ms();
        self.dispatch_msg(Msg::AffordanceActivated { node, at_ms });
    }

    /// Handles every message waiting on the channel. Returns how many there were.
    pub fn pump(&mut self) -> usize {
        let mut inbox = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            inbox.push(msg);
        }
        let count = inbox.len();
        for msg in inbox {
            self.dispatch_msg(msg);
        }
        count
    }

    pub fn fire_due_timers(&mut self) {
        for event in self.timers.take_due(self.clock.now()) {
            let msg = match event {
                TimerEvent::RootPoll => self.runner.poll_root(&self.page),
                TimerEvent::Debounce { generation } => Msg::DebounceElapsed { generation },
                TimerEvent::Settle => Msg::SettleElapsed,
            };
            self.dispatch_msg(msg);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Attached, nothing in flight and no one-shot timer armed.
    pub fn is_idle(&self) -> bool {
        let view = self.state.view();
        view.observer_attached && view.pending_jobs == 0 && !self.timers.has_one_shot()
    }

    /// Runs in real time until idle or until `max_wait` has passed.
    pub fn run_until_idle(&mut self, max_wait: Duration) {
        let give_up = self.clock.now() + max_wait;
        loop {
            self.pump();
            self.fire_due_timers();
            if self.is_idle() {
                tl_debug!("Driver idle");
                return;
            }

            let now = self.clock.now();
            if now >= give_up {
                tl_info!(
                    "Wait budget used up with {} jobs pending",
                    self.state.view().pending_jobs
                );
                return;
            }
            let wake = self.next_deadline().map_or(give_up, |deadline| deadline.min(give_up));
            let timeout = wake.saturating_duration_since(now);
            if let Ok(msg) = self.msg_rx.recv_timeout(timeout) {
                self.dispatch_msg(msg);
            }
        }
    }

    pub fn dispatch_msg(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                if let Some(follow_up) =
                    self.runner
                        .run(effect, &mut self.page, &mut self.timers, &self.clock)
                {
                    queue.push_back(follow_up);
                }
            }
        }
    }
}
