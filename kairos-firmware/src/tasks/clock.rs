//! RTC task
//!
//! Brings the MCP7940M up on I2C0, then polls it at the configured interval
//! and publishes each reading on [`CLOCK_READING`].

use core::fmt::Write;

use defmt::{error, info, trace, warn};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker, Timer};
use heapless::String;

use kairos_core::config::ClockConfig;
use kairos_core::time::{Date, Time};
use kairos_drivers::bus::EmbeddedHalBus;
use kairos_drivers::rtc::{Mcp7940m, RtcError};
use kairos_hal::{I2cBusError, SharedI2cDevice};

use crate::channels::{ClockReading, CLOCK_READING};

/// I2C0 wrapped as a driver bus
pub type RtcBus = EmbeddedHalBus<I2c<'static, I2C0, Blocking>>;

/// The RTC driver as the firmware wires it
pub type Rtc = Mcp7940m<SharedI2cDevice<'static, CriticalSectionRawMutex, RtcBus>>;

/// Consecutive failed reads before the task reports the chip as lost
const MAX_READ_FAILURES: u32 = 5;

/// Clock task
///
/// Startup order: seed the date and time from the config if present (and
/// restart the oscillator after `set_time` stopped it), otherwise start
/// the oscillator if the config asks for it. A failed bring-up ends the
/// task; polling never does.
#[embassy_executor::task]
pub async fn clock_task(mut rtc: Rtc, config: ClockConfig) {
    info!("Clock task starting...");

    // Give the chip time to come out of power-on reset
    Timer::after(Duration::from_millis(10)).await;

    if let Err(e) = bring_up(&mut rtc, &config) {
        error!("RTC bring-up failed: {:?}", e);
        return;
    }

    let mut ticker = Ticker::every(Duration::from_millis(config.rtc.poll_interval_ms as u64));
    let mut failures: u32 = 0;

    loop {
        ticker.next().await;

        match read_clock(&mut rtc) {
            Ok(reading) => {
                if failures >= MAX_READ_FAILURES {
                    info!("RTC responding again after {} failed reads", failures);
                }
                failures = 0;
                trace!("RTC: {}", format_reading(&reading).as_str());
                CLOCK_READING.signal(reading);
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                if failures == MAX_READ_FAILURES {
                    error!("RTC not responding ({} reads failed)", failures);
                } else {
                    warn!("RTC read failed: {:?}", e);
                }
            }
        }
    }
}

fn bring_up(rtc: &mut Rtc, config: &ClockConfig) -> Result<(), RtcError<I2cBusError>> {
    if let Some(date) = config.initial_date {
        rtc.set_date(&date)?;
        info!("Date set to 20{=u8:02}-{=u8:02}-{=u8:02}", date.year, date.month, date.day);
    }

    if let Some(time) = config.initial_time {
        rtc.set_time(&time)?;
        rtc.start_oscillator()?;
        info!("Time set to {=u8:02}:{=u8:02}:{=u8:02}", time.hours, time.minutes, time.seconds);
    } else if config.rtc.start_oscillator {
        rtc.init()?;
        info!("Oscillator started");
    }

    Ok(())
}

/// Read time then date
fn read_clock(rtc: &mut Rtc) -> Result<ClockReading, RtcError<I2cBusError>> {
    let mut time = Time::default();
    let mut date = Date::default();
    rtc.get_time(&mut time)?;
    rtc.get_date(&mut date)?;
    Ok(ClockReading { time, date })
}

/// "20YY-MM-DD HH:MM:SS[ AM/PM]"
pub fn format_reading(reading: &ClockReading) -> String<32> {
    let mut line = String::new();
    // 22 characters at most, cannot overflow
    let _ = core::write!(line, "{} {}", reading.date, reading.time);
    line
}
