//! Hardware Abstraction Layer (HAL) for the TCS34725 RGBC sensor
//!
//! This crate holds everything below the sensor state machine: the register
//! transport, the register map, and the value types that cross it. It lets
//! the controller run against real I2C or a simulated bus without change.
//!
//! # Architecture Layers
//!
//! ```text
//! Command dispatch (tcs34725 crate)
//!         ↓
//! Sensor controller (tcs34725 crate)
//!         ↓
//! Register transport (this crate)
//!         ↓
//! embedded-hal I2C bus
//! ```
//!
//! # Features
//!
//! - `std`: Enable the [`mocks`] module (simulated transport and delay)
//! - `defmt`: Enable `defmt::Format` derives on public types
//!
//! # Example
//!
//! ```no_run
//! use platform::{I2cRegisterTransport, RegisterTransport, tcs34725::REG_STATUS};
//!
//! fn avalid<I: embedded_hal::i2c::I2c>(i2c: I) -> Result<bool, I::Error> {
//!     let mut bus = I2cRegisterTransport::tcs34725(i2c);
//!     Ok(bus.read_register(REG_STATUS)? & 0x01 != 0)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod mocks;
pub mod sensor_types;
pub mod tcs34725;
pub mod transport;

// Re-export transport types
pub use transport::{I2cRegisterTransport, RegisterTransport};

// Re-export sensor types
pub use sensor_types::{compose_sample, Channel, DominantColor, Gain, OutOfRangeError, RgbcReading};

// Re-export configuration
pub use config::{InitProfile, INIT_PROFILE};
