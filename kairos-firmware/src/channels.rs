//! Inter-task communication
//!
//! The clock task publishes every successful read here. Consumers only
//! ever want the latest reading, so a `Signal` (overwrite) is used rather
//! than a queue.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use kairos_core::time::{Date, Time};

/// One consistent read of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct ClockReading {
    pub time: Time,
    pub date: Date,
}

/// Latest clock reading (updated by the clock task)
pub static CLOCK_READING: Signal<CriticalSectionRawMutex, ClockReading> = Signal::new();
