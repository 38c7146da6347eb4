//! Configuration loading
//!
//! The configuration is embedded at build time (and already validated by
//! build.rs), so a parse failure here means the on-device parser and the
//! build-time validator disagree. Fall back to defaults and say so.

use defmt::*;

use kairos_core::config::{parse_config, ClockConfig};
use kairos_core::HourFormat;

/// Parse the embedded configuration, falling back to defaults
pub fn load(source: &str) -> ClockConfig {
    match parse_config(source) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            log_summary(&config);
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            ClockConfig::default()
        }
    }
}

fn log_summary(config: &ClockConfig) {
    info!(
        "RTC at {=u8:#x} ({=u8:#x} 7-bit), {}",
        config.rtc.address,
        kairos_hal::seven_bit_address(config.rtc.address),
        match config.rtc.hour_format {
            HourFormat::TwentyFour => "24h",
            HourFormat::Twelve => "12h",
        }
    );
    debug!("  I2C frequency: {} Hz", config.i2c.frequency);
    debug!("  Poll interval: {} ms", config.rtc.poll_interval_ms);
    debug!("  Start oscillator: {}", config.rtc.start_oscillator);
    if config.initial_time.is_some() || config.initial_date.is_some() {
        info!("  Initial time/date will be written at boot");
    }
}
