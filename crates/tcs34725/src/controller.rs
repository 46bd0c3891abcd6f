//! TCS34725 sensor controller
//!
//! Owns the register transport and a delay source and tracks where the
//! device is in its power-up sequence:
//!
//! ```text
//! Uninitialized ──initialize()──▶ Initializing ──all writes ok──▶ Ready
//!       ▲                              │
//!       └──────── any write failed ────┘
//! ```
//!
//! There is no way back from `Ready` short of [`Tcs34725::release`] and
//! constructing a new controller.
//!
//! # Timing
//!
//! `initialize` blocks for the settle and integration waits of the profile
//! (703 ms for the only supported profile). It cannot be cancelled: the
//! oscillator and ADC need that time before AEN and before the first result.

use embedded_hal::delay::DelayNs;
use platform::config::{InitProfile, INIT_PROFILE};
use platform::tcs34725::{
    integration_time_us, CONTROL_AGAIN_MASK, ENABLE_AEN, ENABLE_PON, REG_ATIME, REG_CONTROL, REG_ENABLE,
    REG_STATUS, STATUS_AVALID,
};
use platform::{compose_sample, Channel, Gain, RegisterTransport, RgbcReading};

use crate::error::{Access, InvalidArgument, SensorError};

/// Power-up state of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorState {
    /// Constructed, nothing written yet (or the last `initialize` failed).
    Uninitialized,
    /// Power-up sequence in progress.
    Initializing,
    /// ADC enabled and the first integration cycle has elapsed.
    Ready,
}

impl core::fmt::Display for SensorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Result type of controller operations.
pub type SensorResult<T, R> = Result<T, SensorError<<R as RegisterTransport>::Error>>;

/// TCS34725 driver.
///
/// Generic over:
/// - `T`: a [`RegisterTransport`] addressing the sensor.
/// - `D`: an [`embedded_hal::delay::DelayNs`] for the power-up waits.
///
/// In host tests supply `platform::mocks::SimulatedTransport` and its
/// `RecordingDelay`.
pub struct Tcs34725<T, D> {
    transport: T,
    delay: D,
    state: SensorState,
    profile: InitProfile,
    gain: Option<Gain>,
}

impl<T, D> Tcs34725<T, D>
where
    T: RegisterTransport,
    D: DelayNs,
{
    /// Create an uninitialized controller. No bus traffic.
    pub fn new(transport: T, delay: D) -> Self {
        Self {
            transport,
            delay,
            state: SensorState::Uninitialized,
            profile: INIT_PROFILE,
            gain: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SensorState {
        self.state
    }

    /// `true` once `initialize` has completed.
    pub fn is_ready(&self) -> bool {
        self.state == SensorState::Ready
    }

    /// Last gain successfully written, if any.
    ///
    /// `None` means CONTROL still holds whatever the device powered up with.
    pub fn gain(&self) -> Option<Gain> {
        self.gain
    }

    /// Power-up profile in use.
    pub fn profile(&self) -> InitProfile {
        self.profile
    }

    // -----------------------------------------------------------------------
    // Register helpers
    // -----------------------------------------------------------------------

    fn read(&mut self, register: u8) -> SensorResult<u8, T> {
        self.transport
            .read_register(register)
            .map_err(SensorError::bus(register, Access::Read))
    }

    fn write(&mut self, register: u8, value: u8) -> SensorResult<(), T> {
        self.transport
            .write_register(register, value)
            .map_err(SensorError::bus(register, Access::Write))
    }

    fn ensure_ready(&self) -> SensorResult<(), T> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(SensorError::NotReady(self.state))
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Run the power-up sequence.
    ///
    /// 1. ATIME ← profile value
    /// 2. ENABLE ← PON, then wait the settle time
    /// 3. ENABLE ← PON | AEN, then wait one integration period
    ///
    /// The first failing write aborts the sequence and leaves the controller
    /// `Uninitialized`.
    ///
    /// # Errors
    ///
    /// - [`SensorError::AlreadyInitialized`] unless the controller is
    ///   `Uninitialized` (no bus traffic in that case).
    /// - [`SensorError::Bus`] naming the register whose write failed.
    pub fn initialize(&mut self) -> SensorResult<(), T> {
        if self.state != SensorState::Uninitialized {
            return Err(SensorError::AlreadyInitialized(self.state));
        }

        let profile = self.profile();
        tracing::info!(
            atime = profile.atime,
            integration_us = integration_time_us(profile.atime),
            wait_ms = profile.total_wait_ms(),
            "initialising TCS34725"
        );
        self.state = SensorState::Initializing;

        match self.power_up() {
            Ok(()) => {
                self.state = SensorState::Ready;
                tracing::info!("TCS34725 ready");
                Ok(())
            }
            Err(e) => {
                self.state = SensorState::Uninitialized;
                tracing::warn!(error = %e, "TCS34725 initialisation failed");
                Err(e)
            }
        }
    }

    fn power_up(&mut self) -> SensorResult<(), T> {
        let profile = self.profile();

        self.write(REG_ATIME, profile.atime)?;

        // Oscillator must run before the ADC is enabled
        self.write(REG_ENABLE, ENABLE_PON)?;
        self.delay.delay_ms(profile.settle_ms);

        self.write(REG_ENABLE, ENABLE_PON | ENABLE_AEN)?;
        self.delay.delay_ms(profile.integration_ms);

        Ok(())
    }

    /// Read one 16-bit channel sample (low byte, then high byte).
    ///
    /// # Errors
    ///
    /// - [`SensorError::NotReady`] before `initialize` has completed. No bus
    ///   traffic in that case.
    /// - [`SensorError::Bus`] if either register read fails; no partial value
    ///   is returned.
    pub fn read_channel(&mut self, channel: Channel) -> SensorResult<u16, T> {
        self.ensure_ready()?;
        let low = self.read(channel.low_register())?;
        let high = self.read(channel.high_register())?;
        let value = compose_sample(low, high);
        tracing::debug!(channel = channel.name(), value, "channel read");
        Ok(value)
    }

    /// Read all four channels in Clear, Red, Green, Blue order.
    ///
    /// Each channel is a separate pair of transactions; a concurrent
    /// configuration change between them is not detected.
    pub fn read_rgbc(&mut self) -> SensorResult<RgbcReading, T> {
        let mut reading = RgbcReading::default();
        for channel in Channel::ALL {
            let value = self.read_channel(channel)?;
            reading.set(channel, value);
        }
        Ok(reading)
    }

    /// Write CONTROL.AGAIN.
    pub fn set_gain(&mut self, gain: Gain) -> SensorResult<(), T> {
        self.write(REG_CONTROL, gain.bits() & CONTROL_AGAIN_MASK)?;
        self.gain = Some(gain);
        tracing::info!(gain = %gain, "gain set");
        Ok(())
    }

    /// Validate a raw gain index and write it.
    ///
    /// # Errors
    ///
    /// [`SensorError::InvalidArgument`] for anything outside 0..=3, before any
    /// bus traffic; otherwise as [`Tcs34725::set_gain`].
    pub fn set_gain_value(&mut self, value: i32) -> SensorResult<Gain, T> {
        let gain = Gain::try_from(value).map_err(|_| {
            tracing::warn!(value, "rejected gain");
            SensorError::InvalidArgument(InvalidArgument::Gain(value))
        })?;
        self.set_gain(gain)?;
        Ok(gain)
    }

    /// Read STATUS.AVALID.
    ///
    /// `Ok(false)` means the integration cycle has not completed; a failed
    /// read is an `Err`, never `false`.
    pub fn read_status(&mut self) -> SensorResult<bool, T> {
        let status = self.read(REG_STATUS)?;
        Ok(status & STATUS_AVALID != 0)
    }

    /// Give back the transport and delay.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}
