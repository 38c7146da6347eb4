//! Kairos - MCP7940M clock firmware
//!
//! Firmware binary for RP2040 boards with an MCP7940M on I2C0.
//! Reads `clock.toml` (embedded at build time), brings the RTC up and
//! logs the time over defmt.
//!
//! Named after the Greek "kairos", the right or opportune moment.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, I2c};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kairos_drivers::bus::EmbeddedHalBus;
use kairos_drivers::rtc::Mcp7940m;
use kairos_hal::SharedI2cBus;

use crate::tasks::RtcBus;

mod channels;
mod config;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

// The bus must outlive every driver handed a device on it
static I2C_BUS: StaticCell<SharedI2cBus<CriticalSectionRawMutex, RtcBus>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kairos firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);

    // I2C0: SDA=GPIO4, SCL=GPIO5
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = config.i2c.frequency;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    info!("I2C0 initialized at {} Hz", config.i2c.frequency);

    let bus: &'static SharedI2cBus<CriticalSectionRawMutex, RtcBus> =
        I2C_BUS.init(SharedI2cBus::new(EmbeddedHalBus::new(i2c)));
    let rtc = Mcp7940m::with_address(bus.device(), config.rtc.address);

    spawner.spawn(tasks::clock_task(rtc, config)).unwrap();
    info!("All tasks spawned, firmware running");

    // Log the wall clock once a minute
    let mut last_minute = None;
    loop {
        let reading = channels::CLOCK_READING.wait().await;
        if last_minute != Some(reading.time.minutes) {
            last_minute = Some(reading.time.minutes);
            info!("{}", tasks::clock::format_reading(&reading).as_str());
        }
    }
}
