//! embedded-hal I2C adapter
//!
//! Lets any blocking `embedded_hal::i2c::I2c` implementation (embassy-rp,
//! rp2040-hal, linux-embedded-hal, ...) act as an [`I2cBus`].
//!
//! embedded-hal uses 7-bit addresses and ends every transaction with a
//! STOP. The adapter shifts the 8-bit wire address down, and overrides
//! `write_read` with the native repeated-start transaction so register
//! reads still keep the session open.

use embedded_hal::i2c::{Error, ErrorKind, I2c};
use kairos_hal::{seven_bit_address, I2cBus, I2cBusError};

/// [`I2cBus`] over an embedded-hal I2C peripheral
pub struct EmbeddedHalBus<I> {
    i2c: I,
}

impl<I> EmbeddedHalBus<I> {
    /// Wrap an I2C peripheral
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Return the wrapped peripheral
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> I2cBus for EmbeddedHalBus<I> {
    type Error = I2cBusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.i2c
            .write(seven_bit_address(address), data)
            .map_err(map_error)
    }

    /// Plain write: embedded-hal cannot leave a transaction open
    ///
    /// The MCP7940M keeps its register pointer across a STOP, so a pointer
    /// write followed by a separate read still returns the right register.
    fn write_repeated(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c
            .read(seven_bit_address(address), buf)
            .map_err(map_error)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(seven_bit_address(address), write_data, read_buf)
            .map_err(map_error)
    }
}

fn map_error<E: Error>(e: E) -> I2cBusError {
    match e.kind() {
        ErrorKind::Bus => I2cBusError::Bus,
        ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
        ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
        ErrorKind::Overrun => I2cBusError::Overrun,
        _ => I2cBusError::Other,
    }
}
