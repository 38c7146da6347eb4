//! Configuration type definitions
//!
//! These types describe how the firmware sets up the bus and the clock.

use crate::registers::DEFAULT_ADDRESS;
use crate::time::{Date, HourFormat, Time};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RTC chip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RtcConfig {
    /// I2C address, 8-bit wire form
    pub address: u8,
    /// Format used when seeding an initial time
    pub hour_format: HourFormat,
    /// Run `init` (start the oscillator) at boot
    pub start_oscillator: bool,
    /// How often the clock task reads the chip
    pub poll_interval_ms: u32,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            hour_format: HourFormat::TwentyFour,
            start_oscillator: true,
            poll_interval_ms: 1000,
        }
    }
}

/// I2C bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl BusConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz, the MCP7940M maximum)
    pub const FAST: Self = Self { frequency: 400_000 };
}

/// Complete clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    pub rtc: RtcConfig,
    pub i2c: BusConfig,
    /// Time written at boot, in `rtc.hour_format`
    pub initial_time: Option<Time>,
    /// Date written at boot
    pub initial_date: Option<Date>,
}

impl ClockConfig {
    /// Create a config with every default
    pub fn new() -> Self {
        Self::default()
    }
}
