//! Kairos Hardware Abstraction Layer
//!
//! This crate defines the bus capability the RTC driver talks through.
//! Chip HALs, embedded-hal adapters and test doubles implement it, so the
//! driver itself never touches pins, clocks or peripheral registers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (kairos-firmware, etc.)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kairos-drivers (Mcp7940m)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kairos-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  mock / test  │
//! │    adapter    │       │     buses     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C bus operations
//! - [`shared::SharedI2cBus`] - Exclusive-access guard for multi-driver buses

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod shared;

// Re-export key types at crate root for convenience
pub use i2c::{seven_bit_address, I2cBus, I2cBusError};
pub use shared::{SharedI2cBus, SharedI2cDevice};
