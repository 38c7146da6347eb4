//! MCP7940M register map and codec
//!
//! Every timekeeping register packs a decimal field as two BCD nibbles,
//! sometimes next to one or two flag bits. Fields are described by
//! [`BcdField`] descriptors and decoded by one routine, so the masks live
//! in exactly one place.
//!
//! Nothing here touches the bus.

use crate::time::{Date, HourFormat, Time};

/// Default I2C address (8-bit write form of 0x6F)
pub const DEFAULT_ADDRESS: u8 = 0xDE;

/// MCP7940M register addresses
pub mod reg {
    /// Seconds + oscillator start bit
    pub const RTCSEC: u8 = 0x00;
    /// Minutes
    pub const RTCMIN: u8 = 0x01;
    /// Hours + 12/24 format + AM/PM
    pub const RTCHOUR: u8 = 0x02;
    /// Day of week (not decoded)
    pub const RTCWKDAY: u8 = 0x03;
    /// Day of month
    pub const RTCDATE: u8 = 0x04;
    /// Month + leap year flag
    pub const RTCMTH: u8 = 0x05;
    /// Two-digit year
    pub const RTCYEAR: u8 = 0x06;
}

/// Single-bit flags
pub mod bits {
    /// RTCSEC: oscillator start/enable
    pub const ST: u8 = 0x80;
    /// RTCHOUR: 12-hour format when set
    pub const FORMAT_12H: u8 = 0x40;
    /// RTCHOUR: PM when set (12-hour format only)
    pub const PM: u8 = 0x20;
    /// RTCMTH: leap year (read-only in hardware)
    pub const LEAP_YEAR: u8 = 0x20;
    /// RTCWKDAY: weekday field
    pub const WEEKDAY: u8 = 0x07;
}

/// Bit layout of one BCD field inside a register byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcdField {
    /// Mask for the ones digit
    pub ones_mask: u8,
    /// Mask for the tens digit (before shifting)
    pub tens_mask: u8,
    /// Right shift that brings the tens digit down to bit 0
    pub tens_shift: u8,
}

impl BcdField {
    const fn new(tens_mask: u8) -> Self {
        Self {
            ones_mask: 0x0F,
            tens_mask,
            tens_shift: 4,
        }
    }

    /// Largest value the field can hold
    pub const fn max_value(&self) -> u8 {
        ((self.tens_mask >> self.tens_shift) * 10) + 9
    }
}

/// Field descriptors
pub mod field {
    use super::BcdField;

    pub const SECONDS: BcdField = BcdField::new(0x70);
    pub const MINUTES: BcdField = BcdField::new(0x70);
    pub const HOURS_24: BcdField = BcdField::new(0x30);
    pub const HOURS_12: BcdField = BcdField::new(0x10);
    pub const DAY: BcdField = BcdField::new(0x30);
    pub const MONTH: BcdField = BcdField::new(0x10);
    pub const YEAR: BcdField = BcdField::new(0xF0);
}

/// Decode a BCD field from a register byte
///
/// Bits outside the field's masks (flags) are ignored.
#[inline]
pub const fn decode_bcd(byte: u8, field: BcdField) -> u8 {
    ((byte & field.tens_mask) >> field.tens_shift) * 10 + (byte & field.ones_mask)
}

/// Encode a decimal value as two packed BCD nibbles
///
/// The value must be in 0-99 and within the target field's range. Larger
/// values produce a malformed byte; nothing checks this.
#[inline]
pub const fn encode_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Decode the seconds register (ST bit ignored)
pub const fn decode_seconds(byte: u8) -> u8 {
    decode_bcd(byte, field::SECONDS)
}

/// Decode the minutes register
pub const fn decode_minutes(byte: u8) -> u8 {
    decode_bcd(byte, field::MINUTES)
}

/// Decode the hours register
///
/// Returns `(hours, format, pm)`. The format bit selects the tens mask.
/// In 24-hour format bit 5 is the high tens bit, not PM, and `pm` is
/// reported as `false`.
pub const fn decode_hours(byte: u8) -> (u8, HourFormat, bool) {
    if byte & bits::FORMAT_12H != 0 {
        (
            decode_bcd(byte, field::HOURS_12),
            HourFormat::Twelve,
            byte & bits::PM != 0,
        )
    } else {
        (decode_bcd(byte, field::HOURS_24), HourFormat::TwentyFour, false)
    }
}

/// Build the hours register byte
///
/// The PM bit is only set in 12-hour format.
pub const fn encode_hours(time: &Time) -> u8 {
    let mut byte = 0;
    if let HourFormat::Twelve = time.format {
        byte |= bits::FORMAT_12H;
        if time.pm {
            byte |= bits::PM;
        }
    }
    byte | encode_bcd(time.hours)
}

/// Decode the day-of-month register
pub const fn decode_day(byte: u8) -> u8 {
    decode_bcd(byte, field::DAY)
}

/// Decode the month digits (leap year flag ignored)
pub const fn decode_month(byte: u8) -> u8 {
    decode_bcd(byte, field::MONTH)
}

/// Decode the leap year flag from the month register
pub const fn decode_leap_year(byte: u8) -> bool {
    byte & bits::LEAP_YEAR != 0
}

/// Decode the year register
pub const fn decode_year(byte: u8) -> u8 {
    decode_bcd(byte, field::YEAR)
}

/// Seconds register value written by `init`: oscillator on, 00 seconds
pub const SECONDS_OSCILLATOR_START: u8 = bits::ST;

/// Decode a full time from the three timekeeping registers
pub const fn decode_time(sec: u8, min: u8, hour: u8) -> Time {
    let (hours, format, pm) = decode_hours(hour);
    Time {
        hours,
        minutes: decode_minutes(min),
        seconds: decode_seconds(sec),
        format,
        pm,
    }
}

/// Decode a full date from the day, month and year registers
pub const fn decode_date(day: u8, month: u8, year: u8) -> Date {
    Date {
        day: decode_day(day),
        month: decode_month(month),
        year: decode_year(year),
        leap_year: decode_leap_year(month),
    }
}
