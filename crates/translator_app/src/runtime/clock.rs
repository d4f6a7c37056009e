use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Utc;

pub trait Clock {
    /// Monotonic time, used for timer deadlines.
    fn now(&self) -> Instant;
    /// Wall-clock milliseconds since the Unix epoch, used for job ids.
    fn epoch_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    epoch_ms: u64,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new(epoch_ms: u64) -> Self {
        Self {
            origin: Instant::now(),
            epoch_ms,
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }

    fn epoch_ms(&self) -> u64 {
        let elapsed_ms = u64::try_from(self.elapsed.get().as_millis()).unwrap_or(u64::MAX);
        self.epoch_ms.saturating_add(elapsed_ms)
    }
}
