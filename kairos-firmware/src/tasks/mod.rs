//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod clock;

pub use clock::{clock_task, Rtc, RtcBus};
