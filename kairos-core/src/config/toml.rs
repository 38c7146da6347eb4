//! Simple TOML parser for clock configuration
//!
//! A minimal, allocation-free parser for the subset of TOML the clock
//! configuration uses. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Hexadecimal integers (`0xDE`) and `_` digit separators
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys
//!
//! Unknown keys are ignored.

use crate::time::{Date, HourFormat, Time};

use super::types::ClockConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or does not parse
    InvalidValue,
    /// Value parsed but is outside the field's range
    OutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Rtc,
    I2c,
    InitialTime,
    InitialDate,
}

/// Initial time as written in the file, before the format is known
#[derive(Default)]
struct RawTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
    pm: bool,
}

/// Parse TOML configuration into ClockConfig
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::new();
    let mut section = Section::Root;

    // [rtc] may come after [initial_time], so the format is applied last
    let mut raw_time: Option<RawTime> = None;
    let mut date: Option<Date> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            match section {
                Section::InitialTime => raw_time = Some(RawTime::default()),
                Section::InitialDate => date = Some(Date::new(1, 1, 0)),
                _ => {}
            }
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };

        match section {
            Section::Root => {} // No root keys
            Section::Rtc => match key {
                "address" => config.rtc.address = parse_int(value)?,
                "hour_format" => config.rtc.hour_format = parse_hour_format(value)?,
                "start_oscillator" => config.rtc.start_oscillator = parse_bool(value)?,
                "poll_interval_ms" => {
                    let ms: u32 = parse_int(value)?;
                    if ms == 0 {
                        return Err(ParseError::OutOfRange);
                    }
                    config.rtc.poll_interval_ms = ms;
                }
                _ => {} // Ignore unknown keys
            },
            Section::I2c => match key {
                "frequency" => config.i2c.frequency = parse_int(value)?,
                _ => {}
            },
            Section::InitialTime => {
                let t = raw_time.as_mut().ok_or(ParseError::InvalidSection)?;
                match key {
                    "hours" => t.hours = parse_int(value)?,
                    "minutes" => t.minutes = parse_int(value)?,
                    "seconds" => t.seconds = parse_int(value)?,
                    "pm" => t.pm = parse_bool(value)?,
                    _ => {}
                }
            }
            Section::InitialDate => {
                let d = date.as_mut().ok_or(ParseError::InvalidSection)?;
                match key {
                    "day" => d.day = parse_int(value)?,
                    "month" => d.month = parse_int(value)?,
                    "year" => d.year = parse_year(value)?,
                    _ => {}
                }
            }
        }
    }

    if let Some(raw) = raw_time {
        let time = match config.rtc.hour_format {
            HourFormat::TwentyFour => Time::new_24h(raw.hours, raw.minutes, raw.seconds),
            HourFormat::Twelve => Time::new_12h(raw.hours, raw.minutes, raw.seconds, raw.pm),
        };
        if !time.is_valid() {
            return Err(ParseError::OutOfRange);
        }
        config.initial_time = Some(time);
    }

    if let Some(date) = date {
        if !date.is_valid() {
            return Err(ParseError::OutOfRange);
        }
        config.initial_date = Some(date);
    }

    Ok(config)
}

/// Parse section header like "rtc" or "initial_time"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "rtc" => Ok(Section::Rtc),
        "i2c" => Ok(Section::I2c),
        "initial_time" => Ok(Section::InitialTime),
        "initial_date" => Ok(Section::InitialDate),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing comment that is not inside a string
fn strip_comment(value: &str) -> &str {
    match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, decimal or `0x` hex
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let mut digits = [0u8; 16];
    let mut len = 0;
    for b in value.bytes().filter(|&b| b != b'_') {
        *digits.get_mut(len).ok_or(ParseError::InvalidValue)? = b;
        len += 1;
    }
    let s = core::str::from_utf8(&digits[..len]).map_err(|_| ParseError::InvalidValue)?;

    let raw = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse::<u32>()
    }
    .map_err(|_| ParseError::InvalidValue)?;

    T::try_from(raw).map_err(|_| ParseError::OutOfRange)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse hour format
fn parse_hour_format(value: &str) -> Result<HourFormat, ParseError> {
    match parse_string(value) {
        "24h" | "24" => Ok(HourFormat::TwentyFour),
        "12h" | "12" => Ok(HourFormat::Twelve),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a year, two-digit or 20xx
fn parse_year(value: &str) -> Result<u8, ParseError> {
    let year: u32 = parse_int(value)?;
    match year {
        0..=99 => Ok(year as u8),
        2000..=2099 => Ok((year - 2000) as u8),
        _ => Err(ParseError::OutOfRange),
    }
}
