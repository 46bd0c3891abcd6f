//! Error taxonomy shared by the controller and the dispatch surface.
//!
//! Every failure a caller can see is one [`SensorError`] variant. Bus errors
//! keep the transport's own error value plus the register and direction that
//! failed; nothing is ever reported as a sample or a readiness value.

use crate::controller::SensorState;

/// Negative errno values returned across a host boundary.
pub mod errno {
    /// I/O error.
    pub const EIO: i32 = 5;
    /// Bad address (payload copy failed).
    pub const EFAULT: i32 = 14;
    /// Resource busy.
    pub const EBUSY: i32 = 16;
    /// No such device.
    pub const ENODEV: i32 = 19;
    /// Invalid argument.
    pub const EINVAL: i32 = 22;
    /// Inappropriate ioctl for device.
    pub const ENOTTY: i32 = 25;
    /// Try again.
    pub const EAGAIN: i32 = 11;
}

/// Direction of a failed register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Register read.
    Read,
    /// Register write.
    Write,
}

impl core::fmt::Display for Access {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Why an argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidArgument {
    /// Gain index outside 0..=3.
    #[error("gain {0} is not one of 0, 1, 2, 3")]
    Gain(i32),
    /// Command requires a payload buffer and none was supplied.
    #[error("command requires a payload")]
    MissingPayload,
    /// Payload buffer has the wrong size.
    #[error("payload is {actual} bytes, expected {expected}")]
    PayloadSize {
        /// Size the command transfers.
        expected: usize,
        /// Size the caller supplied.
        actual: usize,
    },
}

/// Driver error, generic over the transport's bus error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError<E> {
    /// A bus transaction failed.
    #[error("bus {access} of register {register:#04x} failed")]
    Bus {
        /// Register being accessed.
        register: u8,
        /// Read or write.
        access: Access,
        /// Error reported by the transport.
        cause: E,
    },
    /// The operation needs a ready sensor.
    #[error("sensor not ready ({0})")]
    NotReady(SensorState),
    /// `initialize` was called on a sensor that is not uninitialized.
    #[error("sensor already initialized ({0})")]
    AlreadyInitialized(SensorState),
    /// An argument or payload failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(InvalidArgument),
    /// Unknown command identifier.
    #[error("unsupported command {0:#010x}")]
    UnsupportedCommand(u32),
    /// Copying the payload across the caller boundary failed.
    #[error("payload transfer failed")]
    BoundaryTransfer,
    /// The sensor handle has been detached.
    #[error("sensor detached")]
    Detached,
}

/// Error kind without the bus error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// [`SensorError::Bus`].
    Bus,
    /// [`SensorError::NotReady`].
    NotReady,
    /// [`SensorError::AlreadyInitialized`].
    AlreadyInitialized,
    /// [`SensorError::InvalidArgument`].
    InvalidArgument,
    /// [`SensorError::UnsupportedCommand`].
    UnsupportedCommand,
    /// [`SensorError::BoundaryTransfer`].
    BoundaryTransfer,
    /// [`SensorError::Detached`].
    Detached,
}

impl<E> SensorError<E> {
    /// Kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Bus { .. } => ErrorKind::Bus,
            Self::NotReady(_) => ErrorKind::NotReady,
            Self::AlreadyInitialized(_) => ErrorKind::AlreadyInitialized,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UnsupportedCommand(_) => ErrorKind::UnsupportedCommand,
            Self::BoundaryTransfer => ErrorKind::BoundaryTransfer,
            Self::Detached => ErrorKind::Detached,
        }
    }

    /// Negative errno for a host boundary.
    pub const fn errno(&self) -> i32 {
        let code = match self.kind() {
            ErrorKind::Bus => errno::EIO,
            ErrorKind::NotReady => errno::EAGAIN,
            ErrorKind::AlreadyInitialized => errno::EBUSY,
            ErrorKind::InvalidArgument => errno::EINVAL,
            ErrorKind::UnsupportedCommand => errno::ENOTTY,
            ErrorKind::BoundaryTransfer => errno::EFAULT,
            ErrorKind::Detached => errno::ENODEV,
        };
        code.wrapping_neg()
    }

    /// Wrap a transport error with the register it concerned.
    pub(crate) fn bus(register: u8, access: Access) -> impl FnOnce(E) -> Self {
        move |cause| Self::Bus {
            register,
            access,
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestError = SensorError<()>;

    #[test]
    fn test_errno_values_are_negative_and_distinct() {
        let all: [TestError; 7] = [
            SensorError::Bus {
                register: 0x13,
                access: Access::Read,
                cause: (),
            },
            SensorError::NotReady(SensorState::Uninitialized),
            SensorError::AlreadyInitialized(SensorState::Ready),
            SensorError::InvalidArgument(InvalidArgument::Gain(7)),
            SensorError::UnsupportedCommand(0),
            SensorError::BoundaryTransfer,
            SensorError::Detached,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(a.errno() < 0);
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.errno(), b.errno());
            }
        }
    }

    #[test]
    fn test_bus_error_display_names_register() {
        let e: TestError = SensorError::bus(0x16, Access::Read)(());
        assert_eq!(e.to_string(), "bus read of register 0x16 failed");
        assert_eq!(e.kind(), ErrorKind::Bus);
    }

    #[test]
    fn test_invalid_gain_display() {
        let e: TestError = SensorError::InvalidArgument(InvalidArgument::Gain(4));
        assert_eq!(e.to_string(), "invalid argument: gain 4 is not one of 0, 1, 2, 3");
    }
}
