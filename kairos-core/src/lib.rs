//! Board-agnostic core logic for the Kairos RTC driver
//!
//! This crate contains everything that does not touch a bus:
//!
//! - Time and date value types
//! - MCP7940M register map and BCD codec
//! - The real-time clock trait drivers implement
//! - Configuration types and the config file parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod registers;
pub mod time;
pub mod traits;

pub use time::{Date, HourFormat, Time};
