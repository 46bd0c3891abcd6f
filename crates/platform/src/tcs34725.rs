//! TCS34725 RGBC light-to-digital converter register map.
//!
//! Reference: ams TCS3472 datasheet (DS000390), register set §"Register Description".
//!
//! All addresses below are the bare 5-bit register numbers. On the wire every
//! register access is prefixed by a command byte with [`COMMAND_BIT`] set;
//! [`crate::transport::I2cRegisterTransport`] applies it, so callers and the
//! simulated transport work with bare addresses.

/// 7-bit I2C device address (fixed in silicon for the TCS34725 variant).
pub const TCS34725_I2C_ADDR: u8 = 0x29;
/// Command register select bit. Must be set on every register address byte.
pub const COMMAND_BIT: u8 = 0x80;

/// ENABLE: power and ADC enable (PON, AEN, WEN, AIEN).
pub const REG_ENABLE: u8 = 0x00;
/// ATIME: RGBC integration time (256 − ATIME cycles of 2.4 ms).
pub const REG_ATIME: u8 = 0x01;
/// CONTROL: analog gain (AGAIN[1:0]).
pub const REG_CONTROL: u8 = 0x0F;
/// STATUS: AVALID (bit 0) and AINT (bit 4).
pub const REG_STATUS: u8 = 0x13;
/// CDATAL: clear channel low byte.
pub const REG_CDATAL: u8 = 0x14;
/// CDATAH: clear channel high byte.
pub const REG_CDATAH: u8 = 0x15;
/// RDATAL: red channel low byte.
pub const REG_RDATAL: u8 = 0x16;
/// RDATAH: red channel high byte.
pub const REG_RDATAH: u8 = 0x17;
/// GDATAL: green channel low byte.
pub const REG_GDATAL: u8 = 0x18;
/// GDATAH: green channel high byte.
pub const REG_GDATAH: u8 = 0x19;
/// BDATAL: blue channel low byte.
pub const REG_BDATAL: u8 = 0x1A;
/// BDATAH: blue channel high byte.
pub const REG_BDATAH: u8 = 0x1B;

/// ENABLE value: oscillator on (PON).
pub const ENABLE_PON: u8 = 0x01;
/// ENABLE value: RGBC ADC enable (AEN). Only valid together with PON.
pub const ENABLE_AEN: u8 = 0x02;
/// STATUS mask for AVALID: an integration cycle has completed.
pub const STATUS_AVALID: u8 = 0x01;
/// CONTROL mask for the AGAIN field.
pub const CONTROL_AGAIN_MASK: u8 = 0b11;

/// ATIME value for the 700 ms high-sensitivity profile (256 integration cycles).
pub const ATIME_700MS: u8 = 0x00;
/// Oscillator warm-up time after PON before AEN may be set (datasheet: 2.4 ms).
pub const POWER_ON_SETTLE_MS: u32 = 3;
/// Wait after AEN before the first RGBC result is valid for [`ATIME_700MS`].
pub const INTEGRATION_WAIT_MS: u32 = 700;

/// Integration time in microseconds for a given ATIME value.
///
/// Each cycle is 2.4 ms; the cycle count is `256 − ATIME`.
#[inline]
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub const fn integration_time_us(atime: u8) -> u32 {
    (256 - atime as u32) * 2_400
}
