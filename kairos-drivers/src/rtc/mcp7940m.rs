//! MCP7940M real-time clock (I2C)
//!
//! Battery-less sibling of the MCP7940N. Timekeeping lives in seven BCD
//! registers starting at 0x00; this driver reads and writes them one
//! register per bus transaction.
//!
//! # Transactions
//!
//! - Register write: `[reg, value]` in one bus write.
//! - Register read: pointer byte `[reg]` written with the session left
//!   open, then a read of the requested length (repeated START).
//!
//! No retries. A failed transaction is returned to the caller as-is.
//!
//! # Partial failures
//!
//! `get_time`/`get_date` fill the caller's value register by register, so
//! a failed read leaves the fields decoded before it updated. `set_time`
//! and `set_date` write register by register, so a failed write leaves the
//! earlier registers committed on the chip. The MCP7940M has no
//! transactional update across registers.

use kairos_core::registers::{self, bits, reg, DEFAULT_ADDRESS, SECONDS_OSCILLATOR_START};
use kairos_core::time::{Date, Time};
use kairos_core::traits::RealTimeClock;
use kairos_hal::I2cBus;

/// Errors from RTC operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError<E> {
    /// Empty read buffer
    InvalidArgument,
    /// The bus reported a failure
    Transport(E),
}

/// Flat status code for hosts with their own error namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Ok,
    InvalidArgument,
    TransportError,
}

impl<E> RtcError<E> {
    /// Status code for this error
    pub fn status(&self) -> Status {
        match self {
            RtcError::InvalidArgument => Status::InvalidArgument,
            RtcError::Transport(_) => Status::TransportError,
        }
    }
}

impl<T, E> From<&Result<T, RtcError<E>>> for Status {
    fn from(result: &Result<T, RtcError<E>>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

/// MCP7940M driver
///
/// Owns the bus handle (or a `&mut` to it, or a shared-bus device) and the
/// device address. No other state: every call goes to the chip.
pub struct Mcp7940m<B> {
    bus: B,
    address: u8,
}

impl<B> Mcp7940m<B> {
    /// Create a driver at the default address (0xDE)
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, DEFAULT_ADDRESS)
    }

    /// Create a driver at a specific 8-bit wire address
    pub fn with_address(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus handle
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> Mcp7940m<B> {
    /// Write one register
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), RtcError<B::Error>> {
        self.bus
            .write(self.address, &[reg, value])
            .map_err(transport_error(reg))
    }

    /// Read `buf.len()` bytes starting at `reg`
    ///
    /// An empty buffer is rejected before any bus traffic. When the pointer
    /// write fails the read phase is not attempted.
    pub fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), RtcError<B::Error>> {
        if buf.is_empty() {
            return Err(RtcError::InvalidArgument);
        }

        self.bus
            .write_read(self.address, &[reg], buf)
            .map_err(transport_error(reg))
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8, RtcError<B::Error>> {
        let mut buf = [0u8; 1];
        self.read_register(reg, &mut buf)?;
        Ok(buf[0])
    }

    /// Start the oscillator
    ///
    /// Writes ST=1 with all seconds digits zero. Not read back.
    pub fn init(&mut self) -> Result<(), RtcError<B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("MCP7940M @ {=u8:#x}: starting oscillator", self.address);

        self.write_register(reg::RTCSEC, SECONDS_OSCILLATOR_START)
    }

    /// Set ST without touching the seconds digits
    ///
    /// Read-modify-write of the seconds register, for restarting the
    /// oscillator after [`set_time`](Self::set_time).
    pub fn start_oscillator(&mut self) -> Result<(), RtcError<B::Error>> {
        let sec = self.read_byte(reg::RTCSEC)?;
        self.write_register(reg::RTCSEC, sec | bits::ST)
    }

    /// Read the time into `time`
    ///
    /// Seconds, minutes, then hours. In 24-hour format `pm` is cleared.
    pub fn get_time(&mut self, time: &mut Time) -> Result<(), RtcError<B::Error>> {
        let sec = self.read_byte(reg::RTCSEC)?;
        time.seconds = registers::decode_seconds(sec);

        let min = self.read_byte(reg::RTCMIN)?;
        time.minutes = registers::decode_minutes(min);

        let hour = self.read_byte(reg::RTCHOUR)?;
        let (hours, format, pm) = registers::decode_hours(hour);
        time.hours = hours;
        time.format = format;
        time.pm = pm;

        Ok(())
    }

    /// Read the date into `date`
    ///
    /// Day, month (with the leap year flag), then year.
    pub fn get_date(&mut self, date: &mut Date) -> Result<(), RtcError<B::Error>> {
        let day = self.read_byte(reg::RTCDATE)?;
        date.day = registers::decode_day(day);

        let month = self.read_byte(reg::RTCMTH)?;
        date.month = registers::decode_month(month);
        date.leap_year = registers::decode_leap_year(month);

        let year = self.read_byte(reg::RTCYEAR)?;
        date.year = registers::decode_year(year);

        Ok(())
    }

    /// Write the time
    ///
    /// Seconds, minutes, then hours. Writing the seconds register clears
    /// ST, which stops the oscillator; call
    /// [`start_oscillator`](Self::start_oscillator) to restart it. Values
    /// are encoded without range checks.
    pub fn set_time(&mut self, time: &Time) -> Result<(), RtcError<B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "MCP7940M @ {=u8:#x}: set time {=u8}:{=u8}:{=u8}",
            self.address,
            time.hours,
            time.minutes,
            time.seconds
        );

        self.write_register(reg::RTCSEC, registers::encode_bcd(time.seconds))?;
        self.write_register(reg::RTCMIN, registers::encode_bcd(time.minutes))?;
        self.write_register(reg::RTCHOUR, registers::encode_hours(time))
    }

    /// Write the date
    ///
    /// Day, month, then year. The leap year flag is read-only on the chip
    /// and is not written.
    pub fn set_date(&mut self, date: &Date) -> Result<(), RtcError<B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "MCP7940M @ {=u8:#x}: set date {=u8}-{=u8}-{=u8}",
            self.address,
            date.year,
            date.month,
            date.day
        );

        self.write_register(reg::RTCDATE, registers::encode_bcd(date.day))?;
        self.write_register(reg::RTCMTH, registers::encode_bcd(date.month))?;
        self.write_register(reg::RTCYEAR, registers::encode_bcd(date.year))
    }
}

/// Wrap a bus error, logging the register it happened on
fn transport_error<E>(_reg: u8) -> impl FnOnce(E) -> RtcError<E> {
    move |e| {
        #[cfg(feature = "defmt")]
        defmt::warn!("MCP7940M: bus error on register {=u8:#x}", _reg);
        RtcError::Transport(e)
    }
}

impl<B: I2cBus> RealTimeClock for Mcp7940m<B> {
    type Error = RtcError<B::Error>;

    fn init(&mut self) -> Result<(), Self::Error> {
        Mcp7940m::init(self)
    }

    fn get_time(&mut self, time: &mut Time) -> Result<(), Self::Error> {
        Mcp7940m::get_time(self, time)
    }

    fn get_date(&mut self, date: &mut Date) -> Result<(), Self::Error> {
        Mcp7940m::get_date(self, date)
    }

    fn set_time(&mut self, time: &Time) -> Result<(), Self::Error> {
        Mcp7940m::set_time(self, time)
    }

    fn set_date(&mut self, date: &Date) -> Result<(), Self::Error> {
        Mcp7940m::set_date(self, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_core::time::HourFormat;
    use kairos_hal::{I2cBusError, SharedI2cBus};

    /// Bus transaction as seen on the wire
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Transaction {
        Write { addr: u8, data: Vec<u8> },
        WriteRepeated { addr: u8, data: Vec<u8> },
        Read { addr: u8, len: usize },
    }

    /// Where the mock should fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fault {
        /// Register write of this register
        Write(u8),
        /// Pointer phase of a read of this register
        Pointer(u8),
        /// Data phase of a read of this register
        Read(u8),
    }

    /// Mock MCP7940M: register file plus a transaction log
    struct MockBus {
        regs: [u8; 8],
        pointer: u8,
        log: Vec<Transaction>,
        fault: Option<Fault>,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                regs: [0; 8],
                pointer: 0,
                log: Vec::new(),
                fault: None,
            }
        }

        fn with_regs(regs: [u8; 8]) -> Self {
            Self {
                regs,
                ..Self::new()
            }
        }

        fn failing(fault: Fault) -> Self {
            Self {
                fault: Some(fault),
                ..Self::new()
            }
        }

        /// Register writes only, as (register, value)
        fn register_writes(&self) -> Vec<(u8, u8)> {
            self.log
                .iter()
                .filter_map(|t| match t {
                    Transaction::Write { data, .. } => Some((data[0], data[1])),
                    _ => None,
                })
                .collect()
        }
    }

    impl I2cBus for MockBus {
        type Error = I2cBusError;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.log.push(Transaction::Write {
                addr: address,
                data: data.to_vec(),
            });
            if self.fault == Some(Fault::Write(data[0])) {
                return Err(I2cBusError::Nack);
            }
            self.regs[data[0] as usize] = data[1];
            Ok(())
        }

        fn write_repeated(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.log.push(Transaction::WriteRepeated {
                addr: address,
                data: data.to_vec(),
            });
            if self.fault == Some(Fault::Pointer(data[0])) {
                return Err(I2cBusError::Nack);
            }
            self.pointer = data[0];
            Ok(())
        }

        fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
            self.log.push(Transaction::Read {
                addr: address,
                len: buf.len(),
            });
            if self.fault == Some(Fault::Read(self.pointer)) {
                return Err(I2cBusError::Bus);
            }
            let start = self.pointer as usize;
            buf.copy_from_slice(&self.regs[start..start + buf.len()]);
            Ok(())
        }
    }

    #[test]
    fn test_init_writes_oscillator_start() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        assert_eq!(rtc.init(), Ok(()));

        let bus = rtc.release();
        assert_eq!(
            bus.log,
            vec![Transaction::Write {
                addr: 0xDE,
                data: vec![0x00, 0x80]
            }]
        );
    }

    #[test]
    fn test_init_returns_transport_error() {
        let mut rtc = Mcp7940m::new(MockBus::failing(Fault::Write(reg::RTCSEC)));
        assert_eq!(rtc.init(), Err(RtcError::Transport(I2cBusError::Nack)));
    }

    #[test]
    fn test_start_oscillator_keeps_seconds() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        rtc.set_time(&Time::new_24h(12, 0, 42)).unwrap();
        rtc.start_oscillator().unwrap();

        let bus = rtc.release();
        assert_eq!(bus.regs[0], 0x80 | 0x42);
        assert_eq!(bus.register_writes().last(), Some(&(0x00, 0xC2)));
    }

    #[test]
    fn test_read_register_sequence() {
        let mut regs = [0u8; 8];
        regs[2] = 0x23;
        let mut rtc = Mcp7940m::new(MockBus::with_regs(regs));

        let mut buf = [0u8; 1];
        rtc.read_register(reg::RTCHOUR, &mut buf).unwrap();
        assert_eq!(buf, [0x23]);

        let bus = rtc.release();
        assert_eq!(
            bus.log,
            vec![
                Transaction::WriteRepeated {
                    addr: 0xDE,
                    data: vec![0x02]
                },
                Transaction::Read { addr: 0xDE, len: 1 },
            ]
        );
    }

    #[test]
    fn test_read_register_empty_buffer() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        let mut buf = [0u8; 0];
        assert_eq!(
            rtc.read_register(reg::RTCSEC, &mut buf),
            Err(RtcError::InvalidArgument)
        );
        assert!(rtc.release().log.is_empty());
    }

    #[test]
    fn test_read_register_pointer_failure_skips_read() {
        let mut rtc = Mcp7940m::new(MockBus::failing(Fault::Pointer(reg::RTCMIN)));

        let mut buf = [0u8; 1];
        assert_eq!(
            rtc.read_register(reg::RTCMIN, &mut buf),
            Err(RtcError::Transport(I2cBusError::Nack))
        );

        let bus = rtc.release();
        assert_eq!(bus.log.len(), 1);
        assert!(matches!(bus.log[0], Transaction::WriteRepeated { .. }));
    }

    #[test]
    fn test_read_register_read_phase_failure() {
        let mut rtc = Mcp7940m::new(MockBus::failing(Fault::Read(reg::RTCSEC)));

        let mut buf = [0u8; 1];
        assert_eq!(
            rtc.read_register(reg::RTCSEC, &mut buf),
            Err(RtcError::Transport(I2cBusError::Bus))
        );
    }

    #[test]
    fn test_set_time_register_writes() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        rtc.set_time(&Time::new_24h(23, 59, 59)).unwrap();

        assert_eq!(
            rtc.release().register_writes(),
            vec![(0x00, 0x59), (0x01, 0x59), (0x02, 0x23)]
        );
    }

    #[test]
    fn test_set_time_12h_pm() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        rtc.set_time(&Time::new_12h(10, 5, 0, true)).unwrap();

        // format bit 0x40 | PM 0x20 | 0x10
        assert_eq!(rtc.release().register_writes()[2], (0x02, 0x70));
    }

    #[test]
    fn test_set_time_24h_ignores_pm() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        let mut time = Time::new_24h(7, 0, 0);
        time.pm = true;
        rtc.set_time(&time).unwrap();

        assert_eq!(rtc.release().register_writes()[2], (0x02, 0x07));
    }

    #[test]
    fn test_set_then_get_time() {
        let cases = [
            Time::new_24h(0, 0, 0),
            Time::new_24h(13, 7, 42),
            Time::new_24h(23, 59, 59),
            Time::new_12h(12, 0, 1, false),
            Time::new_12h(9, 41, 30, false),
            Time::new_12h(11, 59, 59, true),
            Time::new_12h(12, 30, 0, true),
        ];

        for expected in cases {
            let mut rtc = Mcp7940m::new(MockBus::new());
            rtc.set_time(&expected).unwrap();

            let mut time = Time::default();
            rtc.get_time(&mut time).unwrap();
            assert_eq!(time, expected);
        }
    }

    #[test]
    fn test_get_time_decodes_registers() {
        let mut regs = [0u8; 8];
        regs[0] = 0x80 | 0x45; // oscillator running, 45 s
        regs[1] = 0x23;
        regs[2] = 0x23;
        let mut rtc = Mcp7940m::new(MockBus::with_regs(regs));

        let time = rtc.time().unwrap();
        assert_eq!(time, Time::new_24h(23, 23, 45));
    }

    #[test]
    fn test_get_time_24h_clears_stale_pm() {
        let mut regs = [0u8; 8];
        regs[2] = 0x21;
        let mut rtc = Mcp7940m::new(MockBus::with_regs(regs));

        let mut time = Time::new_12h(5, 0, 0, true);
        rtc.get_time(&mut time).unwrap();

        assert_eq!(time.hours, 21);
        assert_eq!(time.format, HourFormat::TwentyFour);
        assert!(!time.pm);
    }

    #[test]
    fn test_get_time_partial_failure() {
        let mut bus = MockBus::failing(Fault::Read(reg::RTCMIN));
        bus.regs[0] = 0x17;
        bus.regs[1] = 0x33;
        bus.regs[2] = 0x08;
        let mut rtc = Mcp7940m::new(bus);

        let mut time = Time::new_24h(1, 2, 3);
        assert_eq!(
            rtc.get_time(&mut time),
            Err(RtcError::Transport(I2cBusError::Bus))
        );

        // Seconds decoded before the failure, the rest untouched
        assert_eq!(time, Time::new_24h(1, 2, 17));

        // Hours register was never addressed
        let bus = rtc.release();
        assert!(!bus.log.contains(&Transaction::WriteRepeated {
            addr: 0xDE,
            data: vec![reg::RTCHOUR]
        }));
    }

    #[test]
    fn test_get_date_populates_leap_year() {
        let mut regs = [0u8; 8];
        regs[4] = 0x29;
        regs[5] = 0x20 | 0x02;
        regs[6] = 0x24;
        let mut rtc = Mcp7940m::new(MockBus::with_regs(regs));

        let mut date = Date::default();
        assert_eq!(rtc.get_date(&mut date), Ok(()));
        assert_eq!(date, Date::new(29, 2, 24).with_leap_year(true));
    }

    #[test]
    fn test_get_date_clears_leap_year() {
        let mut regs = [0u8; 8];
        regs[4] = 0x01;
        regs[5] = 0x10;
        regs[6] = 0x25;
        let mut rtc = Mcp7940m::new(MockBus::with_regs(regs));

        let mut date = Date::new(1, 1, 0).with_leap_year(true);
        rtc.get_date(&mut date).unwrap();
        assert_eq!(date, Date::new(1, 10, 25));
    }

    #[test]
    fn test_get_date_failure_status() {
        let mut rtc = Mcp7940m::new(MockBus::failing(Fault::Pointer(reg::RTCYEAR)));

        let result = rtc.date();
        assert_eq!(Status::from(&result), Status::TransportError);
    }

    #[test]
    fn test_set_date_register_writes() {
        let mut rtc = Mcp7940m::new(MockBus::new());

        // Leap flag is read-only and must not reach the month register
        rtc.set_date(&Date::new(31, 12, 99).with_leap_year(true))
            .unwrap();

        assert_eq!(
            rtc.release().register_writes(),
            vec![(0x04, 0x31), (0x05, 0x12), (0x06, 0x99)]
        );
    }

    #[test]
    fn test_set_time_mid_sequence_failure() {
        let mut rtc = Mcp7940m::new(MockBus::failing(Fault::Write(reg::RTCMIN)));

        assert_eq!(
            rtc.set_time(&Time::new_24h(10, 20, 30)),
            Err(RtcError::Transport(I2cBusError::Nack))
        );

        // Seconds already committed, hours never attempted
        let bus = rtc.release();
        assert_eq!(bus.regs[0], 0x30);
        assert_eq!(bus.regs[2], 0x00);
        assert_eq!(bus.register_writes(), vec![(0x00, 0x30), (0x01, 0x20)]);
    }

    #[test]
    fn test_custom_address() {
        let mut rtc = Mcp7940m::with_address(MockBus::new(), 0xD0);
        assert_eq!(rtc.address(), 0xD0);

        rtc.init().unwrap();
        assert!(matches!(
            rtc.release().log[0],
            Transaction::Write { addr: 0xD0, .. }
        ));
    }

    #[test]
    fn test_status_mapping() {
        let ok: Result<(), RtcError<I2cBusError>> = Ok(());
        assert_eq!(Status::from(&ok), Status::Ok);
        assert_eq!(
            RtcError::<I2cBusError>::InvalidArgument.status(),
            Status::InvalidArgument
        );
        assert_eq!(
            RtcError::Transport(I2cBusError::Timeout).status(),
            Status::TransportError
        );
    }

    #[test]
    fn test_trait_object_usage() {
        fn tick<C: RealTimeClock>(clock: &mut C) -> Result<Time, C::Error> {
            clock.init()?;
            clock.set_time(&Time::new_24h(6, 0, 0))?;
            clock.time()
        }

        let mut rtc = Mcp7940m::new(MockBus::new());
        assert_eq!(tick(&mut rtc), Ok(Time::new_24h(6, 0, 0)));
    }

    #[test]
    fn test_borrowed_bus() {
        let mut bus = MockBus::new();
        {
            let mut rtc = Mcp7940m::new(&mut bus);
            rtc.set_date(&Date::new(4, 7, 26)).unwrap();
        }
        assert_eq!(bus.regs[4..7], [0x04, 0x07, 0x26]);
    }

    #[test]
    fn test_shared_bus_two_drivers() {
        use embassy_sync::blocking_mutex::raw::NoopRawMutex;

        let shared: SharedI2cBus<NoopRawMutex, MockBus> = SharedI2cBus::new(MockBus::new());

        let mut rtc = Mcp7940m::new(shared.device());
        let mut other = Mcp7940m::with_address(shared.device(), 0xD0);

        rtc.set_time(&Time::new_24h(8, 15, 0)).unwrap();
        other.init().unwrap();

        // The second driver's init overwrote the seconds register on the
        // same mock chip
        assert_eq!(rtc.time(), Ok(Time::new_24h(8, 15, 0)));

        let bus = shared.into_inner();
        let addrs: Vec<u8> = bus
            .log
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { addr, .. } => Some(*addr),
                _ => None,
            })
            .collect();
        assert_eq!(addrs, vec![0xDE, 0xDE, 0xDE, 0xD0]);
    }
}
