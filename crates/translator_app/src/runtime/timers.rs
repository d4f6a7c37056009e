use std::time::{Duration, Instant};

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    RootPoll,
    Debounce { generation: u64 },
    Settle,
}

#[derive(Debug, Clone, Copy)]
struct RootPoll {
    next: Instant,
    interval: Duration,
}

/// The driver's three timers. There is only ever one debounce deadline:
/// arming it again replaces the previous one.
#[derive(Debug, Default)]
pub struct Timers {
    root_poll: Option<RootPoll>,
    debounce: Option<(Instant, u64)>,
    settle: Option<Instant>,
}

impl Timers {
    /// Schedules polls every `interval`, the first one `interval` from `now`.
    pub fn start_root_poll(&mut self, now: Instant, interval: Duration) {
        self.root_poll = Some(RootPoll {
            next: now + interval,
            interval,
        });
    }

    pub fn stop_root_poll(&mut self) {
        self.root_poll = None;
    }

    pub fn arm_debounce(&mut self, deadline: Instant, generation: u64) {
        self.debounce = Some((deadline, generation));
    }

    pub fn schedule_settle(&mut self, deadline: Instant) {
        self.settle = Some(deadline);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True while a debounce or settle deadline is still ahead.
    pub fn has_one_shot(&self) -> bool {
        self.debounce.is_some() || self.settle.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.root_poll.map(|poll| poll.next),
            self.debounce.map(|(deadline, _)| deadline),
            self.settle,
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    /// A due root poll is rescheduled one interval later.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerEvent> {
        let mut due = Vec::new();
        if let Some(poll) = self.root_poll.as_mut() {
            if poll.next <= now {
                due.push((poll.next, TimerEvent::RootPoll));
                poll.next = now + poll.interval;
            }
        }
        if let Some((deadline, generation)) = self.debounce {
            if deadline <= now {
                due.push((deadline, TimerEvent::Debounce { generation }));
                self.debounce = None;
            }
        }
        if let Some(deadline) = self.settle {
            if deadline <= now {
                due.push((deadline, TimerEvent::Settle));
                self.settle = None;
            }
        }
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, event)| event).collect()
    }
}
