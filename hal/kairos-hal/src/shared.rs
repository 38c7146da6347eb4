//! Shared I2C bus
//!
//! Several drivers can sit on one physical bus. The chip register pointer
//! and the bus itself are shared state, so every transaction runs under a
//! blocking mutex owned here rather than by any one driver.
//!
//! The raw mutex is a type parameter: firmware uses
//! `CriticalSectionRawMutex`, single-context code and host tests use
//! `NoopRawMutex`.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::i2c::I2cBus;

/// An I2C bus guarded for exclusive access
pub struct SharedI2cBus<M: RawMutex, B> {
    bus: Mutex<M, RefCell<B>>,
}

impl<M: RawMutex, B> SharedI2cBus<M, B> {
    /// Wrap a bus
    pub const fn new(bus: B) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(bus)),
        }
    }

    /// Get a device handle for one driver
    pub fn device(&self) -> SharedI2cDevice<'_, M, B> {
        SharedI2cDevice { shared: self }
    }

    /// Consume the guard and return the bus
    pub fn into_inner(self) -> B {
        self.bus.into_inner().into_inner()
    }

    fn with<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        self.bus.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Handle to a [`SharedI2cBus`] for one driver
///
/// Each call holds the lock for the whole transaction. `write_read` holds it
/// across both phases so no other device can move the register pointer in
/// between.
pub struct SharedI2cDevice<'a, M: RawMutex, B> {
    shared: &'a SharedI2cBus<M, B>,
}

impl<M: RawMutex, B: I2cBus> I2cBus for SharedI2cDevice<'_, M, B> {
    type Error = B::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.shared.with(|bus| bus.write(address, data))
    }

    fn write_repeated(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.shared.with(|bus| bus.write_repeated(address, data))
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.shared.with(|bus| bus.read(address, buf))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.shared
            .with(|bus| bus.write_read(address, write_data, read_buf))
    }
}
