//! Register transport
//!
//! Single-byte register access to one fixed peripheral. This is the only
//! layer that touches the bus; everything above it talks in register
//! addresses and byte values.

use embedded_hal::i2c::I2c;

use crate::tcs34725::{COMMAND_BIT, TCS34725_I2C_ADDR};

/// 8-bit register read/write against one peripheral.
///
/// Implementations perform exactly one bus transaction per call and never
/// retry. A failed transaction is reported as `Err`, never as a byte value.
pub trait RegisterTransport {
    /// Bus error type.
    type Error: core::fmt::Debug;

    /// Read one register.
    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Write one register.
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    type Error = T::Error;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        (**self).read_register(register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(register, value)
    }
}

/// [`RegisterTransport`] over a blocking embedded-hal I2C bus.
///
/// Register reads are a repeated-start `write_read` of one address byte and
/// one data byte; writes send `[address, value]`. The address byte is OR-ed
/// with `command` (the TCS34725 COMMAND bit).
pub struct I2cRegisterTransport<I> {
    i2c: I,
    address: u8,
    command: u8,
}

impl<I: I2c> I2cRegisterTransport<I> {
    /// Transport for a TCS34725 at its fixed address.
    pub fn tcs34725(i2c: I) -> Self {
        Self::new(i2c, TCS34725_I2C_ADDR, COMMAND_BIT)
    }

    /// Transport for an arbitrary address and command prefix.
    pub fn new(i2c: I, address: u8, command: u8) -> Self {
        Self {
            i2c,
            address,
            command,
        }
    }

    /// 7-bit device address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the underlying I2C bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterTransport for I2cRegisterTransport<I> {
    type Error = I::Error;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        let address = self.address();
        let mut buf = [0u8];
        self.i2c
            .write_read(address, &[self.command | register], &mut buf)
            .inspect_err(|e| {
                tracing::warn!(address, register, error = ?e, "register read failed");
            })?;
        let [value] = buf;
        Ok(value)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        let address = self.address();
        self.i2c
            .write(address, &[self.command | register, value])
            .inspect_err(|e| {
                tracing::warn!(address, register, value, error = ?e, "register write failed");
            })
    }
}
