//! Runtime around the translator core: driver loop, effect execution,
//! timers, settings file and logging.
mod clock;
mod driver;
mod effects;
pub mod logging;
mod persistence;
mod render;
mod timers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::Driver;
pub use effects::{reply_to_msg, EffectRunner, MsgReplySink};
pub use persistence::{FileSettingsStore, SettingsFileError};
pub use render::{render_status, render_transcript};
pub use timers::{TimerEvent, Timers};
