//! I2C bus abstractions
//!
//! Provides the transport capability the RTC driver is built on. Chip
//! HALs, embedded-hal adapters and test doubles implement [`I2cBus`].

/// I2C bus master
///
/// Addresses are passed in the 8-bit wire form (7-bit address shifted left,
/// R/W bit clear), the way the MCP7940M datasheet quotes them. Adapters for
/// 7-bit APIs convert with [`seven_bit_address`].
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device and release the bus (STOP)
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write data to a device without releasing the bus
    ///
    /// The next [`read`](I2cBus::read) on the same address continues the
    /// session with a repeated START. This is the "more to follow" marker of
    /// the register-pointer-then-read idiom.
    fn write_repeated(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data from a device at the given address
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single session (repeated start)
    ///
    /// Commonly used to set a register pointer then read its contents.
    /// The read phase is never attempted when the write phase fails.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write_repeated(address, write_data)?;
        self.read(address, read_buf)
    }
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    type Error = B::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }

    fn write_repeated(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_repeated(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_read(address, write_data, read_buf)
    }
}

/// Convert an 8-bit wire address to the 7-bit form
pub const fn seven_bit_address(address: u8) -> u8 {
    address >> 1
}

/// Error from I2C operations
///
/// Common error kinds that chip-specific errors are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error (misplaced START/STOP)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Timeout
    Timeout,
    /// Overrun
    Overrun,
    /// Other error
    Other,
}
