//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in kairos-core and kairos-hal:
//!
//! - RTC drivers (MCP7940M)
//! - Bus adapters (embedded-hal 1.0 I2C)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod rtc;
