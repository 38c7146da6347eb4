//! Real-time clock trait

use crate::time::{Date, Time};

/// Trait for battery-less or battery-backed RTC chips
///
/// Every call is a synchronous bus round trip; nothing is cached. The
/// output-parameter accessors fill the caller's value field by field, so
/// on error the fields decoded before the failing read keep their new
/// values.
pub trait RealTimeClock {
    /// Error type for clock operations
    type Error;

    /// Start the oscillator
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Read the current time into `time`
    fn get_time(&mut self, time: &mut Time) -> Result<(), Self::Error>;

    /// Read the current date into `date`
    fn get_date(&mut self, date: &mut Date) -> Result<(), Self::Error>;

    /// Write the time
    ///
    /// Registers are written one at a time. A failure part way leaves the
    /// earlier registers committed; the chip has no way to roll back.
    fn set_time(&mut self, time: &Time) -> Result<(), Self::Error>;

    /// Write the date (the leap year flag is read-only and not written)
    fn set_date(&mut self, date: &Date) -> Result<(), Self::Error>;

    /// Read the current time
    fn time(&mut self) -> Result<Time, Self::Error> {
        let mut time = Time::default();
        self.get_time(&mut time)?;
        Ok(time)
    }

    /// Read the current date
    fn date(&mut self) -> Result<Date, Self::Error> {
        let mut date = Date::default();
        self.get_date(&mut date)?;
        Ok(date)
    }
}
