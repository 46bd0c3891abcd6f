//! Command dispatch
//!
//! [`SensorDevice`] is the one owned handle every caller goes through. It
//! holds the controller inside a blocking mutex, so each dispatched command
//! (including a full four-channel read or a gain change) runs to completion
//! before the next one touches the bus:
//!
//! ```text
//! caller A ─┐
//!           ├─▶ SensorDevice ──lock──▶ Tcs34725 ──▶ RegisterTransport
//! caller B ─┘
//! ```
//!
//! The raw-mutex flavour `M` is picked by the integrator. The lock is held
//! for the whole command, so with `read_rgbc` that is eight I2C transfers
//! back to back:
//!
//! - `NoopRawMutex`: all callers on one executor or task. No cost, and the
//!   choice for firmware whose I2C driver is interrupt-driven.
//! - `ThreadModeRawMutex`: callers in thread mode only; interrupts stay
//!   enabled while the bus is busy.
//! - `CriticalSectionRawMutex`: callers on different threads or interrupt
//!   priorities. On a single-core MCU this masks interrupts for the whole
//!   command, which stalls (or deadlocks) an I2C peripheral that completes
//!   transfers from its own interrupt; only pair it with a polled bus. On a
//!   host with `critical-section/std` it is one process-wide lock, so every
//!   other critical section waits behind the sensor.
//!
//! # Lifecycle
//!
//! [`SensorDevice::attach`] builds the controller and runs the power-up
//! sequence. [`SensorDevice::detach`] takes the controller out under the lock
//! and hands the bus back; every later call fails with
//! [`SensorError::Detached`].

mod command;
mod payload;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use platform::{Channel, RegisterTransport, RgbcReading};

use crate::controller::{SensorResult, SensorState, Tcs34725};
use crate::error::{InvalidArgument, SensorError};

pub use command::{iow, ior, Command, CommandId, Direction, Response, IOCTL_MAGIC, PAYLOAD_SIZE};
pub use payload::{TransferFault, UserBuffer};

/// Error returned by a failed [`SensorDevice::attach`], with the bus handed
/// back.
pub type AttachError<T, D> = (SensorError<<T as RegisterTransport>::Error>, T, D);

/// Shared, lock-guarded handle to one attached sensor.
pub struct SensorDevice<M: RawMutex, T, D> {
    handle: Mutex<M, RefCell<Option<Tcs34725<T, D>>>>,
}

impl<M, T, D> SensorDevice<M, T, D>
where
    M: RawMutex,
    T: RegisterTransport,
    D: DelayNs,
{
    /// Wrap an existing controller without touching the bus.
    ///
    /// The controller keeps whatever state it is in; commands that need a
    /// ready sensor fail with `NotReady` until it is initialised.
    pub fn new(controller: Tcs34725<T, D>) -> Self {
        Self {
            handle: Mutex::new(RefCell::new(Some(controller))),
        }
    }

    /// Construct the controller and run the power-up sequence.
    ///
    /// Blocks for the full settle and integration wait.
    ///
    /// # Errors
    ///
    /// The initialisation error, together with the transport and delay so
    /// the caller can retry or release the bus.
    pub fn attach(transport: T, delay: D) -> Result<Self, AttachError<T, D>> {
        let mut controller = Tcs34725::new(transport, delay);
        if let Err(e) = controller.initialize() {
            tracing::warn!(error = %e, "TCS34725 attach failed");
            let (transport, delay) = controller.release();
            return Err((e, transport, delay));
        }
        tracing::info!("TCS34725 attached");
        Ok(Self::new(controller))
    }

    /// Take the controller out and return its transport and delay.
    ///
    /// Waits for any in-flight command. `None` if already detached.
    pub fn detach(&self) -> Option<(T, D)> {
        let controller = self.handle.lock(|cell| cell.borrow_mut().take())?;
        tracing::info!("TCS34725 detached");
        Some(controller.release())
    }

    /// `false` once [`SensorDevice::detach`] has run.
    pub fn is_attached(&self) -> bool {
        self.handle.lock(|cell| cell.borrow().is_some())
    }

    /// Controller state, or `None` when detached.
    pub fn state(&self) -> Option<SensorState> {
        self.handle
            .lock(|cell| cell.borrow().as_ref().map(Tcs34725::state))
    }

    fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut Tcs34725<T, D>) -> SensorResult<R, T>,
    ) -> SensorResult<R, T> {
        self.handle.lock(|cell| {
            let mut slot = cell.borrow_mut();
            let controller = slot.as_mut().ok_or(SensorError::Detached)?;
            f(controller)
        })
    }

    /// Run one typed command under the lock.
    pub fn execute(&self, command: Command) -> SensorResult<Response, T> {
        tracing::debug!(?command, raw = command.id().raw(), "dispatch");
        self.with_controller(|sensor| match command {
            Command::Read(channel) => sensor.read_channel(channel).map(Response::Sample),
            Command::ReadStatus => sensor.read_status().map(Response::Ready),
            Command::SetGain(value) => sensor.set_gain_value(value).map(|_| Response::Done),
        })
    }

    /// Read one channel.
    pub fn read_channel(&self, channel: Channel) -> SensorResult<u16, T> {
        self.with_controller(|sensor| sensor.read_channel(channel))
    }

    /// Read all four channels without releasing the lock in between.
    pub fn read_rgbc(&self) -> SensorResult<RgbcReading, T> {
        self.with_controller(Tcs34725::read_rgbc)
    }

    /// Raw entry point: decode `raw`, move the payload across `buffer`.
    ///
    /// Every command transfers one native-endian `i32`. `SetGain` reads it
    /// from `buffer`; the others write their result into it.
    ///
    /// # Errors
    ///
    /// - [`SensorError::UnsupportedCommand`] for an unknown `raw`, before any
    ///   other check and without bus traffic.
    /// - [`SensorError::InvalidArgument`] for a missing or wrongly sized
    ///   buffer.
    /// - [`SensorError::BoundaryTransfer`] when the copy itself fails.
    /// - Anything [`SensorDevice::execute`] returns.
    pub fn ioctl(&self, raw: u32, buffer: Option<&mut dyn UserBuffer>) -> SensorResult<(), T> {
        let Some(id) = CommandId::from_raw(raw) else {
            tracing::warn!(raw, "unsupported command");
            return Err(SensorError::UnsupportedCommand(raw));
        };

        let buffer = buffer.ok_or(SensorError::InvalidArgument(InvalidArgument::MissingPayload))?;
        if buffer.len() != PAYLOAD_SIZE {
            return Err(SensorError::InvalidArgument(InvalidArgument::PayloadSize {
                expected: PAYLOAD_SIZE,
                actual: buffer.len(),
            }));
        }

        let command = match id {
            CommandId::ReadRed => Command::Read(Channel::Red),
            CommandId::ReadGreen => Command::Read(Channel::Green),
            CommandId::ReadBlue => Command::Read(Channel::Blue),
            CommandId::ReadClear => Command::Read(Channel::Clear),
            CommandId::ReadStatus => Command::ReadStatus,
            CommandId::SetGain => {
                let mut raw_value = [0u8; PAYLOAD_SIZE];
                buffer
                    .copy_in(&mut raw_value)
                    .map_err(|_| SensorError::BoundaryTransfer)?;
                Command::SetGain(i32::from_ne_bytes(raw_value))
            }
        };

        let response = self.execute(command)?;
        if id.direction() == Direction::Out {
            buffer
                .copy_out(&response.to_i32().to_ne_bytes())
                .map_err(|_| SensorError::BoundaryTransfer)?;
        }
        Ok(())
    }
}
