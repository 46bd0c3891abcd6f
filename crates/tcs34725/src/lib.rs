//! TCS34725 RGBC light sensor driver
//!
//! Sensor state machine and command dispatch on top of the `platform`
//! register transport.
//!
//! # Architecture
//!
//! ```text
//! Caller (host tool, device node, firmware task)
//!         ↓
//! SensorDevice (dispatch: command ids, payloads, lock)
//!         ↓
//! Tcs34725 (controller: power-up, gain, status, channel reads)
//!         ↓
//! RegisterTransport (platform: I2C or simulated)
//! ```
//!
//! # Features
//!
//! - `std` - Enable `platform::mocks` for host tools and tests
//! - `defmt` - Derive `defmt::Format` on public types for firmware logging
//!
//! # Example
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use platform::{Channel, I2cRegisterTransport};
//! use tcs34725::SensorDevice;
//!
//! fn red<I, D>(i2c: I, delay: D) -> Option<u16>
//! where
//!     I: embedded_hal::i2c::I2c,
//!     D: embedded_hal::delay::DelayNs,
//! {
//!     let transport = I2cRegisterTransport::tcs34725(i2c);
//!     let device = SensorDevice::<NoopRawMutex, _, _>::attach(transport, delay).ok()?;
//!     device.read_channel(Channel::Red).ok()
//! }
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // register names in doc comments

pub mod controller;
pub mod dispatch;
pub mod error;

pub use controller::{SensorResult, SensorState, Tcs34725};
pub use dispatch::{
    AttachError, Command, CommandId, Direction, Response, SensorDevice, TransferFault, UserBuffer,
};
pub use error::{Access, ErrorKind, InvalidArgument, SensorError};
