//! Simulated bus for testing
//!
//! [`SimulatedTransport`] stands in for a TCS34725 on an I2C bus: a 256-byte
//! register file, per-register fault injection (persistent, or a single
//! failure on the n-th write to a register), and an ordered log of every
//! bus transaction. [`RecordingDelay`] appends its waits to the same log, so
//! tests can check that a delay sits between two particular writes.
//!
//! Both are cheap handles over shared state. Keep a clone for inspection
//! after moving one into a controller.

#![cfg(any(test, feature = "std"))]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use embedded_hal::delay::DelayNs;

use crate::sensor_types::Channel;
use crate::transport::RegisterTransport;

/// One observable action on the simulated bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Register read.
    Read(u8),
    /// Register write of a value.
    Write(u8, u8),
    /// Blocking wait, in nanoseconds.
    Delay(u64),
}

/// Injected bus failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedBusError {
    /// Register whose transaction failed.
    pub register: u8,
}

impl embedded_hal::i2c::Error for SimulatedBusError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        embedded_hal::i2c::ErrorKind::NoAcknowledge(embedded_hal::i2c::NoAcknowledgeSource::Data)
    }
}

struct SimState {
    registers: [u8; 256],
    read_faults: [bool; 256],
    write_faults: [bool; 256],
    /// One-shot write faults: `(register, writes left until the failing one)`.
    nth_write_faults: Vec<(u8, usize)>,
    events: Vec<BusEvent>,
}

impl SimState {
    /// Count a write against the one-shot faults; `true` if this one fails.
    fn take_nth_write_fault(&mut self, register: u8) -> bool {
        let mut fired = false;
        self.nth_write_faults.retain_mut(|(r, left)| {
            if *r != register {
                return true;
            }
            if *left <= 1 {
                fired = true;
                return false;
            }
            *left = left.saturating_sub(1);
            true
        });
        fired
    }
}

/// Simulated single-peripheral register transport.
#[derive(Clone)]
pub struct SimulatedTransport {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedTransport {
    /// All registers zero, no faults.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                registers: [0; 256],
                read_faults: [false; 256],
                write_faults: [false; 256],
                nth_write_faults: Vec::new(),
                events: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delay source sharing this transport's event log.
    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            state: Arc::clone(&self.state),
        }
    }

    /// Preload a register without logging a transaction.
    pub fn set_register(&self, register: u8, value: u8) {
        if let Some(slot) = self.state().registers.get_mut(usize::from(register)) {
            *slot = value;
        }
    }

    /// Current register content.
    pub fn register(&self, register: u8) -> u8 {
        self.state()
            .registers
            .get(usize::from(register))
            .copied()
            .unwrap_or_default()
    }

    /// Preload both data registers of a channel.
    pub fn set_channel(&self, channel: Channel, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.set_register(channel.low_register(), low);
        self.set_register(channel.high_register(), high);
    }

    /// Make every later read of `register` fail.
    pub fn fail_reads_of(&self, register: u8) {
        if let Some(f) = self.state().read_faults.get_mut(usize::from(register)) {
            *f = true;
        }
    }

    /// Make every later write to `register` fail.
    pub fn fail_writes_to(&self, register: u8) {
        if let Some(f) = self.state().write_faults.get_mut(usize::from(register)) {
            *f = true;
        }
    }

    /// Make only the `n`-th write to `register` from now on fail (1-based).
    ///
    /// Earlier and later writes to the register go through, so a test can
    /// fail one step of a sequence that writes the same register twice.
    pub fn fail_nth_write(&self, register: u8, n: usize) {
        self.state().nth_write_faults.push((register, n));
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        let mut state = self.state();
        state.read_faults = [false; 256];
        state.write_faults = [false; 256];
        state.nth_write_faults.clear();
    }

    /// Everything logged so far, in order.
    pub fn events(&self) -> Vec<BusEvent> {
        self.state().events.clone()
    }

    /// Forget the log (register contents and faults are kept).
    pub fn clear_events(&self) {
        self.state().events.clear();
    }

    /// Logged writes as `(register, value)`.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state()
            .events
            .iter()
            .filter_map(|e| match *e {
                BusEvent::Write(r, v) => Some((r, v)),
                _ => None,
            })
            .collect()
    }

    /// Logged reads, by register.
    pub fn reads(&self) -> Vec<u8> {
        self.state()
            .events
            .iter()
            .filter_map(|e| match *e {
                BusEvent::Read(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Number of reads and writes attempted, failed ones included.
    pub fn transaction_count(&self) -> usize {
        self.state()
            .events
            .iter()
            .filter(|e| !matches!(e, BusEvent::Delay(_)))
            .count()
    }
}

impl core::fmt::Debug for SimulatedTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulatedTransport")
            .field("events", &self.state().events.len())
            .finish_non_exhaustive()
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterTransport for SimulatedTransport {
    type Error = SimulatedBusError;

    fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut state = self.state();
        state.events.push(BusEvent::Read(register));
        let idx = usize::from(register);
        if state.read_faults.get(idx).copied().unwrap_or(false) {
            return Err(SimulatedBusError { register });
        }
        Ok(state.registers.get(idx).copied().unwrap_or_default())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.events.push(BusEvent::Write(register, value));
        let idx = usize::from(register);
        let one_shot = state.take_nth_write_fault(register);
        if one_shot || state.write_faults.get(idx).copied().unwrap_or(false) {
            return Err(SimulatedBusError { register });
        }
        if let Some(slot) = state.registers.get_mut(idx) {
            *slot = value;
        }
        Ok(())
    }
}

/// Delay that returns immediately and logs the requested duration.
#[derive(Clone)]
pub struct RecordingDelay {
    state: Arc<Mutex<SimState>>,
}

impl RecordingDelay {
    fn record(&mut self, ns: u64) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .events
            .push(BusEvent::Delay(ns));
    }
}

impl core::fmt::Debug for RecordingDelay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordingDelay").finish_non_exhaustive()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us).saturating_mul(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000_000));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_register_round_trip() {
        let mut bus = SimulatedTransport::new();
        bus.write_register(0x0F, 0x02).unwrap();
        assert_eq!(bus.read_register(0x0F).unwrap(), 0x02);
        assert_eq!(bus.events(), vec![BusEvent::Write(0x0F, 0x02), BusEvent::Read(0x0F)]);
    }

    #[test]
    fn test_injected_read_fault_is_logged_and_reported() {
        let mut bus = SimulatedTransport::new();
        bus.fail_reads_of(0x13);
        assert_eq!(bus.read_register(0x13), Err(SimulatedBusError { register: 0x13 }));
        assert_eq!(bus.transaction_count(), 1);
        bus.clear_faults();
        assert!(bus.read_register(0x13).is_ok());
    }

    #[test]
    fn test_failed_write_leaves_register_untouched() {
        let mut bus = SimulatedTransport::new();
        bus.set_register(0x00, 0x01);
        bus.fail_writes_to(0x00);
        assert!(bus.write_register(0x00, 0x03).is_err());
        assert_eq!(bus.register(0x00), 0x01);
    }

    #[test]
    fn test_nth_write_fault_fires_once() {
        let mut bus = SimulatedTransport::new();
        bus.fail_nth_write(0x00, 2);
        // writes elsewhere do not count
        bus.write_register(0x01, 0xFF).unwrap();
        bus.write_register(0x00, 0x01).unwrap();
        assert_eq!(bus.write_register(0x00, 0x03), Err(SimulatedBusError { register: 0x00 }));
        assert_eq!(bus.register(0x00), 0x01);
        bus.write_register(0x00, 0x03).unwrap();
        assert_eq!(bus.register(0x00), 0x03);
        assert_eq!(bus.transaction_count(), 4);
    }

    #[test]
    fn test_clear_faults_drops_pending_nth_write() {
        let mut bus = SimulatedTransport::new();
        bus.fail_nth_write(0x00, 1);
        bus.clear_faults();
        assert!(bus.write_register(0x00, 0x01).is_ok());
    }

    #[test]
    fn test_delay_shares_the_event_log() {
        let mut bus = SimulatedTransport::new();
        let mut delay = bus.delay();
        bus.write_register(0x00, 0x01).unwrap();
        delay.delay_ms(3);
        assert_eq!(
            bus.events(),
            vec![BusEvent::Write(0x00, 0x01), BusEvent::Delay(3_000_000)]
        );
    }

    #[test]
    fn test_set_channel_splits_little_endian() {
        let bus = SimulatedTransport::new();
        bus.set_channel(Channel::Red, 0x1234);
        assert_eq!(bus.register(Channel::Red.low_register()), 0x34);
        assert_eq!(bus.register(Channel::Red.high_register()), 0x12);
        assert!(bus.events().is_empty());
    }

    #[test]
    fn test_clones_share_registers_and_log() {
        let bus = SimulatedTransport::new();
        let mut handle = bus.clone();
        handle.write_register(0x0F, 0x01).unwrap();
        assert_eq!(bus.register(0x0F), 0x01);
        assert_eq!(bus.writes(), vec![(0x0F, 0x01)]);
    }

    #[test]
    fn test_clear_events_keeps_register_contents() {
        let bus = SimulatedTransport::new();
        let mut handle = bus.clone();
        handle.write_register(0x13, 0x01).unwrap();
        bus.clear_events();
        assert!(bus.events().is_empty());
        assert_eq!(handle.read_register(0x13).unwrap(), 0x01);
        assert_eq!(bus.reads(), vec![0x13]);
    }
}
