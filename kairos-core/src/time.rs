//! Time and date value types
//!
//! Plain values filled in by the driver or built by the caller. No
//! timezone, no sub-second precision, no century: the chip stores a
//! two-digit year and the epoch is the application's business.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hours register encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HourFormat {
    /// 0-23
    #[default]
    TwentyFour,
    /// 1-12 with AM/PM
    Twelve,
}

impl HourFormat {
    /// Whether this is the 12-hour format
    pub const fn is_12h(self) -> bool {
        matches!(self, HourFormat::Twelve)
    }
}

/// Time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Time {
    /// 0-23, or 1-12 in 12-hour format
    pub hours: u8,
    /// 0-59
    pub minutes: u8,
    /// 0-59
    pub seconds: u8,
    /// Register encoding for the hours field
    pub format: HourFormat,
    /// PM flag, only meaningful in 12-hour format
    ///
    /// Ignored when writing a 24-hour time and always `false` after
    /// reading one.
    pub pm: bool,
}

impl Time {
    /// Create a 24-hour time
    pub const fn new_24h(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            format: HourFormat::TwentyFour,
            pm: false,
        }
    }

    /// Create a 12-hour time
    pub const fn new_12h(hours: u8, minutes: u8, seconds: u8, pm: bool) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            format: HourFormat::Twelve,
            pm,
        }
    }

    /// Check every field against its range for the current format
    ///
    /// The driver does not call this; out-of-range values are encoded as-is.
    pub const fn is_valid(&self) -> bool {
        let hours_ok = match self.format {
            HourFormat::TwentyFour => self.hours <= 23,
            HourFormat::Twelve => self.hours >= 1 && self.hours <= 12,
        };
        hours_ok && self.minutes <= 59 && self.seconds <= 59
    }

    /// Hours on a 0-23 scale regardless of format
    ///
    /// 12 AM is 0, 12 PM is 12.
    pub const fn hours_24(&self) -> u8 {
        match self.format {
            HourFormat::TwentyFour => self.hours,
            HourFormat::Twelve => {
                let h = self.hours % 12;
                if self.pm {
                    h + 12
                } else {
                    h
                }
            }
        }
    }

    /// The same instant in 24-hour format
    pub const fn to_24h(&self) -> Self {
        Self::new_24h(self.hours_24(), self.minutes, self.seconds)
    }

    /// The same instant in 12-hour format
    pub const fn to_12h(&self) -> Self {
        let h24 = self.hours_24();
        let h12 = match h24 % 12 {
            0 => 12,
            h => h,
        };
        Self::new_12h(h12, self.minutes, self.seconds, h24 >= 12)
    }

    /// Convert to the given format
    pub const fn with_format(&self, format: HourFormat) -> Self {
        match format {
            HourFormat::TwentyFour => self.to_24h(),
            HourFormat::Twelve => self.to_12h(),
        }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.format.is_12h() {
            f.write_str(if self.pm { " PM" } else { " AM" })?;
        }
        Ok(())
    }
}

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Date {
    /// 1-31, not checked against the month length
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// 0-99, offset from an application-defined century
    pub year: u8,
    /// Leap year flag as reported by the chip
    ///
    /// Read from hardware, never derived from `year`. Not written back.
    pub leap_year: bool,
}

impl Date {
    /// Create a date with the leap year flag clear
    pub const fn new(day: u8, month: u8, year: u8) -> Self {
        Self {
            day,
            month,
            year,
            leap_year: false,
        }
    }

    /// Set the leap year flag
    pub const fn with_leap_year(mut self, leap_year: bool) -> Self {
        self.leap_year = leap_year;
        self
    }

    /// Check day, month and year ranges
    pub const fn is_valid(&self) -> bool {
        self.day >= 1 && self.day <= 31 && self.month >= 1 && self.month <= 12 && self.year <= 99
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "20{:02}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
