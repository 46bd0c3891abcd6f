//! Command identifiers and typed commands.
//!
//! Raw identifiers follow the Linux ioctl number layout
//! (`dir << 30 | size << 16 | type << 8 | nr`) with type `'t'` and a 4-byte
//! `int` payload, so a C caller issuing `_IOR('t', 1, int)` lands on
//! [`CommandId::ReadRed`].

use platform::Channel;

/// ioctl type byte.
pub const IOCTL_MAGIC: u8 = b't';

/// Payload size of every command: one native-endian `i32`.
pub const PAYLOAD_SIZE: usize = core::mem::size_of::<i32>();

const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

const NRSHIFT: u32 = 0;
const TYPESHIFT: u32 = 8;
const SIZESHIFT: u32 = 16;
const DIRSHIFT: u32 = 30;

#[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)] // PAYLOAD_SIZE is 4
const fn ioc(dir: u32, nr: u8) -> u32 {
    (dir << DIRSHIFT)
        | ((PAYLOAD_SIZE as u32) << SIZESHIFT)
        | ((IOCTL_MAGIC as u32) << TYPESHIFT)
        | ((nr as u32) << NRSHIFT)
}

/// `_IOR(IOCTL_MAGIC, nr, int)`
pub const fn ior(nr: u8) -> u32 {
    ioc(IOC_READ, nr)
}

/// `_IOW(IOCTL_MAGIC, nr, int)`
pub const fn iow(nr: u8) -> u32 {
    ioc(IOC_WRITE, nr)
}

/// Which way the payload travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Driver writes a result into the caller's buffer.
    Out,
    /// Driver reads an argument from the caller's buffer.
    In,
}

/// The closed set of supported command identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum CommandId {
    /// Red channel sample.
    ReadRed = ior(1),
    /// Green channel sample.
    ReadGreen = ior(2),
    /// Blue channel sample.
    ReadBlue = ior(3),
    /// Clear channel sample.
    ReadClear = ior(4),
    /// STATUS.AVALID.
    ReadStatus = ior(5),
    /// Write gain 0..=3.
    SetGain = iow(7),
}

impl CommandId {
    /// Every supported identifier.
    pub const ALL: [CommandId; 6] = [
        CommandId::ReadRed,
        CommandId::ReadGreen,
        CommandId::ReadBlue,
        CommandId::ReadClear,
        CommandId::ReadStatus,
        CommandId::SetGain,
    ];

    /// Raw ioctl number.
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Look up a raw number; `None` for anything outside the supported set.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            r if r == Self::ReadRed.raw() => Some(Self::ReadRed),
            r if r == Self::ReadGreen.raw() => Some(Self::ReadGreen),
            r if r == Self::ReadBlue.raw() => Some(Self::ReadBlue),
            r if r == Self::ReadClear.raw() => Some(Self::ReadClear),
            r if r == Self::ReadStatus.raw() => Some(Self::ReadStatus),
            r if r == Self::SetGain.raw() => Some(Self::SetGain),
            _ => None,
        }
    }

    /// Payload direction.
    pub const fn direction(self) -> Direction {
        match self {
            Self::SetGain => Direction::In,
            _ => Direction::Out,
        }
    }
}

/// A decoded command with its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Read one channel.
    Read(Channel),
    /// Read the readiness flag.
    ReadStatus,
    /// Set gain from a raw, not yet validated value.
    SetGain(i32),
}

impl Command {
    /// Identifier this command is dispatched under.
    pub const fn id(self) -> CommandId {
        match self {
            Self::Read(Channel::Red) => CommandId::ReadRed,
            Self::Read(Channel::Green) => CommandId::ReadGreen,
            Self::Read(Channel::Blue) => CommandId::ReadBlue,
            Self::Read(Channel::Clear) => CommandId::ReadClear,
            Self::ReadStatus => CommandId::ReadStatus,
            Self::SetGain(_) => CommandId::SetGain,
        }
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// 16-bit channel sample.
    Sample(u16),
    /// Readiness flag.
    Ready(bool),
    /// Command had no output.
    Done,
}

impl Response {
    /// Value written to the caller's buffer.
    pub fn to_i32(self) -> i32 {
        match self {
            Self::Sample(v) => i32::from(v),
            Self::Ready(r) => i32::from(r),
            Self::Done => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ioctl_numbers_match_linux_encoding() {
        assert_eq!(CommandId::ReadRed.raw(), 0x8004_7401);
        assert_eq!(CommandId::ReadGreen.raw(), 0x8004_7402);
        assert_eq!(CommandId::ReadBlue.raw(), 0x8004_7403);
        assert_eq!(CommandId::ReadClear.raw(), 0x8004_7404);
        assert_eq!(CommandId::ReadStatus.raw(), 0x8004_7405);
        assert_eq!(CommandId::SetGain.raw(), 0x4004_7407);
    }

    #[test]
    fn test_from_raw_recognises_only_the_six_ids() {
        for id in CommandId::ALL {
            assert_eq!(CommandId::from_raw(id.raw()), Some(id));
        }
        assert_eq!(CommandId::from_raw(0), None);
        // nr 6 was never assigned
        assert_eq!(CommandId::from_raw(ior(6)), None);
        // right number, wrong direction
        assert_eq!(CommandId::from_raw(iow(1)), None);
    }

    #[test]
    fn test_only_set_gain_reads_input() {
        for id in CommandId::ALL {
            let expected = if id == CommandId::SetGain {
                Direction::In
            } else {
                Direction::Out
            };
            assert_eq!(id.direction(), expected);
        }
    }

    #[test]
    fn test_response_to_i32() {
        assert_eq!(Response::Sample(0xFFFF).to_i32(), 65535);
        assert_eq!(Response::Ready(true).to_i32(), 1);
        assert_eq!(Response::Ready(false).to_i32(), 0);
        assert_eq!(Response::Done.to_i32(), 0);
    }

    #[test]
    fn test_command_ids() {
        assert_eq!(Command::Read(Channel::Clear).id(), CommandId::ReadClear);
        assert_eq!(Command::SetGain(9).id(), CommandId::SetGain);
    }

    #[test]
    fn test_every_typed_command_has_a_raw_number() {
        let commands = [
            Command::Read(Channel::Red),
            Command::Read(Channel::Green),
            Command::Read(Channel::Blue),
            Command::Read(Channel::Clear),
            Command::ReadStatus,
            Command::SetGain(0),
        ];
        for (command, id) in commands.into_iter().zip(CommandId::ALL) {
            assert_eq!(command.id(), id);
            assert_eq!(CommandId::from_raw(command.id().raw()), Some(id));
        }
    }
}
